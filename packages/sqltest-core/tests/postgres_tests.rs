//! PostgreSQL connector tests
//!
//! Tests that need a live server are ignored by default. Run them with
//! `cargo test -- --ignored` and `SQLTEST_POSTGRES_URL` pointing at a
//! disposable database.

use std::time::Duration;

use ntest::timeout;

use sqltest_core::postgres::PostgresConnector;
use sqltest_core::{
    run, CallStyle, ConnectionSettings, Connector, NoopObserver, RunOptions, SqlTestError,
    TestCaseDefinition, TestFileDefinition,
};

fn live_url() -> String {
    match std::env::var("SQLTEST_POSTGRES_URL") {
        Ok(url) => url,
        Err(_) => panic!("SQLTEST_POSTGRES_URL must point at a disposable database"),
    }
}

fn connector(style: CallStyle) -> PostgresConnector {
    PostgresConnector::new(style, Duration::from_secs(2))
}

/// Nothing listens on port 1, connecting must fail as a fatal error
#[timeout(10000)]
#[test]
fn test_unreachable_server() {
    let settings = ConnectionSettings::new("host=127.0.0.1 port=1 user=nobody connect_timeout=1");
    let connector = connector(CallStyle::Function);
    let err = connector.connect(&settings).err().unwrap();
    assert!(matches!(err, SqlTestError::Connection(_)));
}

/// Return codes from real functions are classified like scripted ones
#[timeout(30000)]
#[test]
#[ignore = "needs SQLTEST_POSTGRES_URL"]
fn test_live_function_return_codes() {
    let url = live_url();
    let mut admin = postgres::Client::connect(&url, postgres::NoTls).unwrap();
    admin
        .batch_execute(
            "CREATE SCHEMA IF NOT EXISTS sqltest_it;
             CREATE OR REPLACE FUNCTION sqltest_it.passes() RETURNS integer
                 LANGUAGE sql AS 'SELECT 0';
             CREATE OR REPLACE FUNCTION sqltest_it.fails() RETURNS integer
                 LANGUAGE sql AS 'SELECT 3';",
        )
        .unwrap();

    let file = TestFileDefinition {
        connection_string: url,
        tests: vec![
            TestCaseDefinition::new("passes"),
            TestCaseDefinition::new("does_not_exist"),
            TestCaseDefinition::new("fails"),
        ],
    };
    let connector = connector(CallStyle::Function);
    let options = RunOptions::with_schema("sqltest_it");
    let results = run(&connector, &file, &options, &mut NoopObserver).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].succeeded());
    assert!(results[1].failure_detail().unwrap().contains("42883"));
    let detail = results[2].failure_detail();
    assert_eq!(detail, Some("non-zero return code: 3"));

    let teardown = "DROP SCHEMA sqltest_it CASCADE";
    admin.batch_execute(teardown).unwrap();
}

/// Procedures report their code through the INOUT parameter
#[timeout(30000)]
#[test]
#[ignore = "needs SQLTEST_POSTGRES_URL"]
fn test_live_procedure_call_style() {
    let url = live_url();
    let mut admin = postgres::Client::connect(&url, postgres::NoTls).unwrap();
    admin
        .batch_execute(
            "CREATE SCHEMA IF NOT EXISTS sqltest_proc;
             CREATE OR REPLACE PROCEDURE sqltest_proc.check_stock(INOUT \"return\" integer)
                 LANGUAGE plpgsql AS $$ BEGIN \"return\" := 0; END $$;",
        )
        .unwrap();

    let file = TestFileDefinition {
        connection_string: url,
        tests: vec![TestCaseDefinition::new("check_stock")],
    };
    let connector = connector(CallStyle::Procedure);
    let options = RunOptions::with_schema("sqltest_proc");
    let results = run(&connector, &file, &options, &mut NoopObserver).unwrap();

    assert!(results[0].succeeded());

    let teardown = "DROP SCHEMA sqltest_proc CASCADE";
    admin.batch_execute(teardown).unwrap();
}
