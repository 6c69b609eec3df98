//! Positional argument partition.

/// Positional arguments split at the first dash-prefixed token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedArgs {
    /// Everything before the first `-`-prefixed argument.
    pub packages: Vec<String>,
    /// The first `-`-prefixed argument and everything after it, verbatim.
    pub raw_flags: Vec<String>,
}

/// First dash wins: no attempt is made to understand individual flags, so a
/// package-looking token after a flag stays in `raw_flags`.
pub fn partition_args<S: AsRef<str>>(args: &[S]) -> PartitionedArgs {
    let split = args
        .iter()
        .position(|a| a.as_ref().starts_with('-'))
        .unwrap_or(args.len());

    let (pkgs, rest) = args.split_at(split);
    PartitionedArgs {
        packages: pkgs.iter().map(|s| s.as_ref().to_string()).collect(),
        raw_flags: rest.iter().map(|s| s.as_ref().to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args() {
        let p = partition_args::<&str>(&[]);
        assert!(p.packages.is_empty());
        assert!(p.raw_flags.is_empty());
    }

    #[test]
    fn packages_only() {
        let p = partition_args(&["./a", "./b"]);
        assert_eq!(p.packages, vec!["./a", "./b"]);
        assert!(p.raw_flags.is_empty());
    }

    #[test]
    fn first_dash_wins() {
        let p = partition_args(&["./a", "-run", "TestFoo", "./b"]);
        assert_eq!(p.packages, vec!["./a"]);
        assert_eq!(p.raw_flags, vec!["-run", "TestFoo", "./b"]);
    }

    #[test]
    fn leading_flag_means_no_packages() {
        let p = partition_args(&["--count=1", "./a"]);
        assert!(p.packages.is_empty());
        assert_eq!(p.raw_flags, vec!["--count=1", "./a"]);
    }
}
