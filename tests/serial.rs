mod common;

macro_rules! define_serial_test {
    ($test_fn:ident) => {
        #[test]
        fn $test_fn() {
            common::$test_fn(1);
        }
    };
}

define_serial_test!(test_four_point_scenario);
define_serial_test!(test_partition_invariant);
define_serial_test!(test_termination);
define_serial_test!(test_cost_monotonicity);
define_serial_test!(test_target_size);
define_serial_test!(test_threshold_mode);
define_serial_test!(test_threshold_queries);
define_serial_test!(test_level_bounds);
define_serial_test!(test_nested_input);
define_serial_test!(test_cancelled);
define_serial_test!(test_cancelled_during_scan);
define_serial_test!(test_empty_data);
define_serial_test!(test_single_input);
