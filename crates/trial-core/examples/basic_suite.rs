//! A small suite exercising every body shape.
//!
//! Run with `cargo run --example basic_suite`, or set `TRIAL_REPORTER=json`
//! for a machine-readable report.

use futures_util::stream;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use trial_core::{expect, expect_fn, Emission, Failure, Outcome};

fn parse_port(input: &str) -> Result<u16, std::num::ParseIntError> {
    input.trim().parse::<u16>()
}

fn main() {
    trial_core::init_logging();

    let fixtures = Rc::new(RefCell::new(Vec::<String>::new()));

    let result = trial_core::run("basic suite", |suite| {
        let setup = Rc::clone(&fixtures);
        suite.before_each(move || setup.borrow_mut().push("fresh".to_string()));

        let teardown = Rc::clone(&fixtures);
        suite.after_each(move || teardown.borrow_mut().clear());

        let seen = Rc::clone(&fixtures);
        suite.it("sees the fixture", move || {
            expect(seen.borrow().clone()).to_equal(vec!["fresh".to_string()])
        });

        suite.it("parses a port", || {
            expect(parse_port("8080")).to_be_ok()?;
            expect_fn(|| parse_port("http").map(|_| ())).to_throw_containing("invalid digit")
        });

        suite.it("waits for a timer", || {
            Outcome::deferred(async {
                tokio::time::sleep(Duration::from_millis(25)).await;
                expect(2 * 21).to_equal(42)
            })
        });

        suite.it("streams values", || {
            Outcome::sequence(stream::iter(
                (1..=3).map(|n| Ok::<_, Failure>(Emission::value(n))),
            ))
        });
    });

    match result {
        Ok(summary) => std::process::exit(if summary.all_passed() { 0 } else { 1 }),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    }
}
