use std::collections::HashMap;

/// Resolves column names without regard to ASCII case, keeping the first
/// spelling seen for each name.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_keeps_first_spelling() {
        let set = CaseInsensitiveSet::new(["Numero_Identificacion", "NUMERO_IDENTIFICACION"]);
        assert_eq!(
            set.get("numero_identificacion"),
            Some("Numero_Identificacion")
        );
        assert_eq!(
            set.get("NUMERO_identificacion"),
            Some("Numero_Identificacion")
        );
        assert_eq!(set.get("nit"), None);
    }
}
