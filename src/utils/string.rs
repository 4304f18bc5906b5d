use rand::Rng as _;

pub struct StringUtils;

impl StringUtils {
    /// `my-app`, `my_app` and `myApp` all become `MyApp`.
    pub fn to_pascal_case(name: &str) -> String {
        Self::words(name)
            .iter()
            .map(|word| {
                let mut c = word.chars();
                match c.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().collect::<String>() + c.as_str(),
                }
            })
            .collect::<String>()
    }

    /// `MyApp`, `my_app` and `my app` all become `my-app`.
    pub fn to_kebab_case(name: &str) -> String {
        Self::words(name)
            .iter()
            .map(|word| word.to_lowercase())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Splits on separators and on lower-to-upper case boundaries.
    fn words(name: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut prev_lower = false;

        for ch in name.chars() {
            if matches!(ch, '-' | '_' | ' ' | '.') {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }

            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            current.push(ch);
        }

        if !current.is_empty() {
            words.push(current);
        }
        words
    }

    /// Appends random digits to `prefix`, e.g. `ionic-react4821337`.
    pub fn unique_name(prefix: &str) -> String {
        let suffix: u32 = rand::rng().random_range(0..10_000_000);
        format!("{prefix}{suffix}")
    }
}
