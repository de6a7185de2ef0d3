mod versioned_schema;

pub use versioned_schema::{
    open_versioned_db, Column, ForeignKey, SqlType, Table, VersionedSchema, BASE_DB_VERSION,
    DEFAULT_TIMESTAMP,
};
