//! Example: parse a report with iterator adapters that cannot return errors
//!
//! Run with `RUST_LOG=disclosure=trace` to see envelopes being disclosed.

use std::io;
use std::num::ParseIntError;

use disclosure::{Disclosed, Disclosing, Envelope, Wrapper};
use tracing_subscriber::{fmt, EnvFilter};

disclosure::envelope! {
    /// Raised while reading report lines
    struct ReportFault;
}

fn read_line(line: &str) -> Result<u32, io::Error> {
    if line.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "empty line"));
    }
    Ok(line.len() as u32)
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let wrapper = Wrapper::<ReportFault>::default();
    let disclosure = Disclosing::<ReportFault>::new()
        .disclose::<(io::Error, ParseIntError)>()
        .on_fallback(|fault| eprintln!("undisclosed: {fault}"));

    let reports: [&[&str]; 3] = [&["12", "7", "30"], &["12", "x"], &["abc", ""]];
    for lines in reports {
        let parse = wrapper.function(|line: &str| line.parse::<u32>());
        let outcome = disclosure.get(|| lines.iter().copied().map(parse).sum::<u32>());
        match outcome {
            Ok(total) => println!("total: {total}"),
            Err(Disclosed::Second(e)) => println!("bad number: {e}"),
            Err(other) => println!("failed: {other}"),
        }

        let length = wrapper.function(read_line);
        match disclosure.get(|| lines.iter().copied().map(length).max()) {
            Ok(longest) => println!("longest: {longest:?}"),
            Err(Disclosed::First(e)) => println!("io error: {e}"),
            Err(other) => println!("failed: {other}"),
        }
    }

    // An envelope nobody expects reaches the fallback and comes back intact
    let fault = ReportFault::from_cause(std::fmt::Error);
    if let Disclosed::Fallback(fault) = disclosure.inspect(fault) {
        println!("fallback: {fault}");
    }
}
