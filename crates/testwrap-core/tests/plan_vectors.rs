//! Plan composition vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use testwrap_core::plan::{compose_flags, partition_args};


#[test]
fn plan_vectors() {
    let files = [
        "defaults.json",
        "report_adds_verbose.json",
        "report_user_verbose.json",
        "raw_flags_passthrough.json",
        "no_cover_no_timeout.json",
    ];

    for f in files {
        let v = vector_loader::load(f);
        let parts = partition_args(v.args.as_slice());
        let flags = compose_flags(&v.spec.to_spec(), &parts.raw_flags);

        assert_eq!(parts.packages, v.expect.packages, "vector={}", v.description);
        assert_eq!(flags, v.expect.flags, "vector={}", v.description);
    }
}
