//! Fixed tables translating the native engine's integer state codes into
//! named states.
//!
//! The native engine reports every state as a small integer whose meaning is
//! defined by the position of the state in an ordered table. A code outside
//! of the table means the engine and this binding disagree on the contract,
//! which is reported as [`Error::ErrStateCodeOutOfRange`] and never retried.

use log::error;
use shared::error::{Error, Result};

/// Integer state code as reported by the native engine.
pub type StateCode = u32;

/// An ordered table mapping native state codes to named states.
///
/// The position of each entry is the code the engine reports for it, so the
/// table must list every state of the engine's enum in the engine's order.
#[derive(Debug)]
pub struct StateTable<S: 'static> {
    name: &'static str,
    states: &'static [S],
}

impl<S: Copy + PartialEq + 'static> StateTable<S> {
    pub const fn new(name: &'static str, states: &'static [S]) -> Self {
        Self { name, states }
    }

    /// name of the table, used in error reports
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// translate maps a native code to its state.
    pub fn translate(&self, code: StateCode) -> Result<S> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.states.get(index))
            .copied()
            .ok_or(Error::ErrStateCodeOutOfRange {
                table: self.name,
                code,
            })
    }

    /// code_of maps a state back to the native code, for writable states.
    pub fn code_of(&self, state: S) -> Option<StateCode> {
        self.states
            .iter()
            .position(|s| *s == state)
            .and_then(|index| StateCode::try_from(index).ok())
    }
}

/// A state tracked as the raw code last reported by the engine.
///
/// Codes are validated when they arrive, reads translate the code again every
/// time so the named state is never stored.
#[derive(Debug)]
pub(crate) struct TrackedState<S: 'static> {
    table: &'static StateTable<S>,
    code: StateCode,
}

impl<S: Copy + PartialEq + Default + 'static> TrackedState<S> {
    pub(crate) fn new(table: &'static StateTable<S>) -> Self {
        Self { table, code: 0 }
    }

    /// update stores a newly reported code and returns its state. An
    /// out-of-range code leaves the tracked code untouched.
    pub(crate) fn update(&mut self, code: StateCode) -> Result<S> {
        match self.table.translate(code) {
            Ok(state) => {
                self.code = code;
                Ok(state)
            }
            Err(err) => {
                error!("native engine reported {}", err);
                Err(err)
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn code(&self) -> StateCode {
        self.code
    }

    pub(crate) fn get(&self) -> S {
        // codes are validated in update, so this only falls back on an
        // empty table
        self.table.translate(self.code).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default, Debug, Copy, Clone, PartialEq)]
    enum Light {
        #[default]
        Unspecified,
        Red,
        Yellow,
        Green,
    }

    static LIGHT_TABLE: StateTable<Light> =
        StateTable::new("light", &[Light::Red, Light::Yellow, Light::Green]);

    #[test]
    fn test_state_table_translate() {
        let tests = vec![(0, Light::Red), (1, Light::Yellow), (2, Light::Green)];

        for (code, expected_state) in tests {
            assert_eq!(LIGHT_TABLE.translate(code), Ok(expected_state));
        }
    }

    #[test]
    fn test_state_table_out_of_range() {
        for code in [3, 42, StateCode::MAX] {
            assert_eq!(
                LIGHT_TABLE.translate(code),
                Err(Error::ErrStateCodeOutOfRange {
                    table: "light",
                    code
                })
            );
        }
    }

    #[test]
    fn test_state_table_code_of() {
        assert_eq!(LIGHT_TABLE.code_of(Light::Green), Some(2));
        assert_eq!(LIGHT_TABLE.code_of(Light::Unspecified), None);
    }

    #[test]
    fn test_tracked_state_rejects_unknown_code() {
        let mut state = TrackedState::new(&LIGHT_TABLE);
        assert_eq!(state.get(), Light::Red);

        assert_eq!(state.update(2), Ok(Light::Green));
        assert_eq!(state.get(), Light::Green);

        let err = state.update(7).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(state.code(), 2);
        assert_eq!(state.get(), Light::Green);
    }
}
