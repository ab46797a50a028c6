//! Assertion macros gated behind a compile-time level.
//!
//! Cheap checks run at [`MIGSCHED_ASSERT_SIMPLE`]; checks which rescan propagator state are placed
//! at higher levels so they can be switched on while debugging without slowing down regular runs.

pub const MIGSCHED_ASSERT_LEVEL_DEFINITION: u8 = MIGSCHED_ASSERT_SIMPLE;

pub const MIGSCHED_ASSERT_SIMPLE: u8 = 1;
pub const MIGSCHED_ASSERT_MODERATE: u8 = 2;
pub const MIGSCHED_ASSERT_ADVANCED: u8 = 3;
pub const MIGSCHED_ASSERT_EXTREME: u8 = 4;

#[macro_export]
macro_rules! migsched_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MIGSCHED_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! migsched_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MIGSCHED_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! migsched_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MIGSCHED_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! migsched_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MIGSCHED_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! migsched_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::MIGSCHED_ASSERT_LEVEL_DEFINITION >= $crate::asserts::MIGSCHED_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
