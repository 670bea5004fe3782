use std::{
    fmt,
    fmt::{Debug, Display},
};

/// A value that must never end up in logs. `Debug` and `Display` both print `****`; the wrapped value is only
/// reachable through [`Secret::reveal`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn secret_is_masked() {
        let secret = Secret::from("hunter2");
        assert_eq!(format!("{secret}"), "****");
        assert_eq!(format!("{secret:?}"), "****");
        assert_eq!(secret.reveal(), "hunter2");
    }

    #[test]
    fn from_owned_and_borrowed_strings() {
        let borrowed = Secret::from("hunter2");
        let owned = Secret::from("hunter2".to_string());
        assert_eq!(borrowed, owned);
        assert_eq!(owned.reveal().as_str(), "hunter2");
        assert_eq!(Secret::new(42u64).reveal(), &42);
    }

    #[test]
    fn masked_inside_structs() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            id: String,
            secret: Secret<String>,
        }
        let creds = Credentials { id: "m1".into(), secret: Secret::from("hunter2") };
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("****"));
        assert!(!dbg.contains("hunter2"));
    }
}
