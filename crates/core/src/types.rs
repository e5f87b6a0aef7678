/// All database primary keys are PostgreSQL BIGSERIAL (artist ids come from
/// the identity provider but share the same representation).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Money in minor currency units (cents). Never a float.
pub type Cents = i64;
