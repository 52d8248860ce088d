/// Localized string lookup supplied by the host.
pub trait Translate {
    fn t(&self, key: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn t(&self, key: &str) -> String {
        self(key)
    }
}

/// Engines name their status line by key, the host decides the wording.
pub trait StatusText {
    fn status_key(&self) -> &'static str;

    fn status_message(&self, strings: &dyn Translate) -> String {
        strings.t(self.status_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl StatusText for Fixed {
        fn status_key(&self) -> &'static str {
            "fixed.status"
        }
    }

    #[test]
    fn closures_translate() {
        let upper = |key: &str| key.to_uppercase();
        assert_eq!(Fixed.status_message(&upper), "FIXED.STATUS");
    }
}
