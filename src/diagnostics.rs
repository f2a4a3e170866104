//! Optional diagnostic output attached to a suite.
//!
//! A diagnostic is opaque: whatever it writes is passed through verbatim
//! after the suite finishes. Nothing here interprets the content.

use crate::workloads::Variant;
use std::io::{self, Write};

pub trait Diagnostic: Send + Sync {
    /// Heading printed above the dump.
    fn title(&self) -> &str;

    fn dump(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Describes the factorial variants that were benchmarked.
pub struct WorkloadListing {
    variants: Vec<Variant>,
    n: u32,
    max_depth: u32,
}

impl WorkloadListing {
    pub fn new(variants: &[Variant], n: u32, max_depth: u32) -> Self {
        Self {
            variants: variants.to_vec(),
            n,
            max_depth,
        }
    }
}

impl Diagnostic for WorkloadListing {
    fn title(&self) -> &str {
        "Workloads"
    }

    fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
        for v in &self.variants {
            let result = v.compute(self.n, self.max_depth);
            match result {
                Ok(value) => writeln!(
                    out,
                    "{:<10} {:<40} {}! has {} bits",
                    v.fn_name(),
                    v.description(),
                    self.n,
                    value.bits()
                )?,
                Err(e) => writeln!(out, "{:<10} {:<40} {}", v.fn_name(), v.description(), e)?,
            }
        }
        Ok(())
    }
}

/// Write every diagnostic under its own heading.
pub fn dump_all(diagnostics: &[Box<dyn Diagnostic>], out: &mut dyn Write) -> io::Result<()> {
    for d in diagnostics {
        writeln!(out, "\n== {} ==", d.title())?;
        d.dump(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_list_each_variant() {
        let listing = WorkloadListing::new(&Variant::ALL, 20, 100);
        let mut out = Vec::new();
        listing.dump(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("fac_while"));
        assert!(text.contains("20! has 62 bits"));
    }

    #[test]
    fn should_report_depth_errors_verbatim() {
        let listing = WorkloadListing::new(&[Variant::Rec], 500, 100);
        let mut out = Vec::new();
        listing.dump(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("recursion depth exceeded"));
    }

    #[test]
    fn should_print_heading_per_diagnostic() {
        let diags: Vec<Box<dyn Diagnostic>> =
            vec![Box::new(WorkloadListing::new(&[Variant::Iter], 5, 10))];
        let mut out = Vec::new();
        dump_all(&diags, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("\n== Workloads =="));
    }
}
