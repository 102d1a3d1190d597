//! Scenario testing system for deterministic game testing
//!
//! Runs scripted input files against the headless gameplay chain and checks
//! the emitted event sequence and world state.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, WorldState, check_absent, check_sequence, check_state};
pub use input::{FrameActions, ScriptedInputs};
pub use parser::{
    ExpectedEvent, FrameInput, StateAssertion, TestDefinition, TestExpectations, TestSetup,
    parse_test_file,
};
pub use runner::{TestResult, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
