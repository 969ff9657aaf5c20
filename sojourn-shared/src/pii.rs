use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps guest contact data so it cannot leak through Debug formatting.
///
/// Serialization passes the real value through: API responses need it, and
/// the console is the only consumer. The masking targets log macros like
/// tracing::info!("{:?}", booking).
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_masked_serialize_is_not() {
        let contact = Masked("555-0100".to_string());
        assert_eq!(format!("{:?}", contact), "********");
        assert_eq!(
            serde_json::to_string(&contact).unwrap(),
            "\"555-0100\""
        );
    }
}
