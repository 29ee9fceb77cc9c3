use uuid::Uuid;

/// Trait for generating session identifiers
pub trait SessionIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 identifiers in simple (hyphen-free) form.
///
/// Collisions are not checked for.
pub struct UuidSessionIdGenerator;

impl UuidSessionIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UuidSessionIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionIdGenerator for UuidSessionIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
