mod common;

use brace_orm::context::{default_reader, reset_defaults, set_default_connection, set_default_writer};
use brace_orm::{connect, Orm, OrmError};
use common::RecordingDriver;
use std::sync::Arc;

// Defaults are process-wide, so the whole lifecycle runs in one test.
#[test]
fn test_default_connection_lifecycle() {
    reset_defaults();
    assert!(matches!(Orm::from_defaults(), Err(OrmError::NoDefaultConnection("reader"))));

    let driver = Arc::new(RecordingDriver::new());
    set_default_writer(Arc::new(connect(driver.clone(), Vec::new())));
    assert!(matches!(default_reader(), Err(OrmError::NoDefaultConnection("reader"))));

    set_default_connection(Arc::new(connect(driver.clone(), Vec::new())));
    let orm = Orm::from_defaults().unwrap();
    orm.query("select 1", &brace_orm::Data::new()).unwrap();
    assert_eq!(driver.last_sql(), "select 1");

    reset_defaults();
    assert!(matches!(Orm::from_defaults(), Err(OrmError::NoDefaultConnection(_))));
}
