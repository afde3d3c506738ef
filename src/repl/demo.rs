//! Static demo: a fixed client of the session API

use tracing::debug;

use crate::session::{Session, SessionResult};

/// Fragments fed to the session, in order. The `for` loop head and its body
/// are added separately to show that fragments are joined verbatim.
pub const DEMO_STATEMENTS: &[&str] = &[
    "let i = 10;",
    "println!(\"{}\", i);",
    "if i < 100 { println!(\"i is less than 100\"); }",
    "for r in 0..5 ",
    "{ println!(\"{}\", r); }",
];

/// Queue the demo statements on `session` without running them
pub fn queue(session: &mut Session) -> SessionResult<()> {
    for statement in DEMO_STATEMENTS {
        debug!("demo: {}", statement);
        session.add(*statement)?;
    }
    Ok(())
}

/// Queue and run the demo
pub fn run(session: &mut Session) -> SessionResult<bool> {
    println!(
        "\nThe following output was produced from Rust statements \
         sent in from a client of the Session API.\n"
    );
    queue(session)?;
    session.run()
}
