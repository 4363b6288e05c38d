//! Property tests for naming and list parsing.

use proptest::prelude::*;

use crate::phases::integrate::destination_branch;
use crate::phases::tags::normalize_version;
use crate::repolist::parse_line;

proptest! {
    #[test]
    fn non_primary_branches_are_always_namespaced(
        name in "[a-z][a-z0-9-]{0,12}",
        branch in "[a-z][a-z0-9/-]{0,12}",
    ) {
        prop_assume!(branch != "main");
        let dest = destination_branch("main", &name, &branch);
        prop_assert_eq!(dest, format!("{}/{}", name, branch));
    }

    #[test]
    fn destination_branch_is_stable(
        primary in "[a-z][a-z0-9-]{0,12}",
        name in "[a-z][a-z0-9-]{0,12}",
        branch in "[a-z][a-z0-9/-]{0,12}",
    ) {
        let first = destination_branch(&primary, &name, &branch);
        let second = destination_branch(&primary, &name, &branch);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn primary_branch_is_never_namespaced(
        primary in "[a-z][a-z0-9-]{0,12}",
        name in "[a-z][a-z0-9-]{0,12}",
    ) {
        let primary_clone = primary.clone();
        prop_assert_eq!(destination_branch(&primary, &name, &primary), primary_clone);
    }

    #[test]
    fn normalization_never_grows_a_name(raw in ".*") {
        prop_assert!(normalize_version(&raw).len() <= raw.len());
    }

    #[test]
    fn normalization_strips_at_most_one_char(raw in ".*") {
        prop_assert!(raw.len() - normalize_version(&raw).len() <= 1);
    }

    #[test]
    fn parse_line_roundtrips_explicit_fields(
        location in "[a-z][a-z0-9:/._-]{0,24}",
        name in "[a-z][a-z0-9._-]{0,12}",
        folder in "[a-z][a-z0-9/._-]{0,12}",
    ) {
        let line = format!("{} {} {}", location, name, folder);
        let spec = parse_line(&line, 1).unwrap().unwrap();
        prop_assert_eq!(spec.location, location);
        prop_assert_eq!(spec.name, name);
        prop_assert_eq!(spec.folder, folder);
    }
}
