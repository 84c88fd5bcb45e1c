//! Password storage format.

/// Turns a raw password into its stored form and checks candidates against it.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, raw: &str) -> String;
    fn verify(&self, raw: &str, stored: &str) -> bool;
}

/// Stores passwords as given. Existing `users` rows hold plaintext.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plaintext;

impl PasswordScheme for Plaintext {
    fn hash(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn verify(&self, raw: &str, stored: &str) -> bool {
        raw == stored
    }
}
