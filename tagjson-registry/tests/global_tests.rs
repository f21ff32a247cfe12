//! The process-wide registry. Kept in its own test binary: installing the
//! global registry is a once-per-process event.

use tagjson_registry::{ConverterRegistry, RegistrationError};

#[test]
fn global_lifecycle() {
    let mut registry = ConverterRegistry::new();
    registry.register(tagjson_registry::builtin::UuidConverter).unwrap();

    let installed = registry.install_global().unwrap();
    assert_eq!(installed.len(), 1);

    // Reads see the installed registry, not the built-in default.
    let global = ConverterRegistry::global();
    assert_eq!(global.keys().collect::<Vec<_>>(), vec!["uuid"]);

    // Registration is closed once installed.
    let err = ConverterRegistry::with_builtins()
        .install_global()
        .unwrap_err();
    assert_eq!(err, RegistrationError::GlobalAlreadyInstalled);
}
