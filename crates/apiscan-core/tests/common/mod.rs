use apiscan_core::model::{Modifier, RawDeclaration};
use apiscan_core::{build, BuildOptions, Snapshot};

/// Public class declaration
#[allow(dead_code)]
pub fn public_class(name: &str) -> RawDeclaration {
    RawDeclaration::class(name).with_modifiers([Modifier::Public])
}

/// Public interface declaration (abstract, as the symbol source reports it)
#[allow(dead_code)]
pub fn public_interface(name: &str) -> RawDeclaration {
    RawDeclaration::interface(name).with_modifiers([Modifier::Public])
}

/// Public instance method returning `V` with no parameters
#[allow(dead_code)]
pub fn public_method(name: &str) -> RawDeclaration {
    RawDeclaration::method(name).with_modifiers([Modifier::Public])
}

/// Build a snapshot with default options, asserting nothing was rejected
#[allow(dead_code)]
pub fn snapshot(artifact: &str, declarations: Vec<RawDeclaration>) -> Snapshot {
    let output = build(artifact, &declarations, &BuildOptions::default()).expect("build failed");
    assert!(
        output.rejected.is_empty(),
        "unexpected rejected declarations: {:?}",
        output.rejected
    );
    output.snapshot
}

/// Build a snapshot with `include_inherited` set
#[allow(dead_code)]
pub fn snapshot_with_inherited(artifact: &str, declarations: Vec<RawDeclaration>) -> Snapshot {
    let options = BuildOptions {
        include_inherited: true,
        ..BuildOptions::default()
    };
    build(artifact, &declarations, &options)
        .expect("build failed")
        .snapshot
}
