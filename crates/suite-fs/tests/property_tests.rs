use proptest::prelude::*;
use suite_fs::{SuiteLayout, validate_path_identifier};

proptest! {
    #[test]
    fn test_valid_identifiers_stay_inside_bin(s in "\\PC*") {
        // Anything accepted as an identifier must land directly in bin/
        if validate_path_identifier(&s).is_ok() {
            let layout = SuiteLayout::new("/suite");
            let stub = layout.stub_path(&s);
            let bin_dir = layout.bin_dir();
            prop_assert_eq!(stub.parent(), Some(bin_dir.as_path()));
            prop_assert_eq!(SuiteLayout::from_stub(&stub), Some(layout));
        }
    }
}
