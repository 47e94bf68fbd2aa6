use apiscan_core::model::{Modifier, RawDeclaration};
use apiscan_core::{build, BuildOptions, Snapshot};
use apiscan_engine::commands::scan::ArtifactInput;

/// Public class declaration
#[allow(dead_code)]
pub fn public_class(name: &str) -> RawDeclaration {
    RawDeclaration::class(name).with_modifiers([Modifier::Public])
}

/// Public instance method returning `V` with no parameters
#[allow(dead_code)]
pub fn public_method(name: &str) -> RawDeclaration {
    RawDeclaration::method(name).with_modifiers([Modifier::Public])
}

/// Artifact whose API spans several packages, so comparisons split into
/// several partitions.
#[allow(dead_code)]
pub fn multi_package_input(name: &str, version: u32) -> ArtifactInput {
    let mut decls = Vec::new();
    for package in ["com.acme.core", "com.acme.io", "com.acme.util", "org.other"] {
        let widget = format!("{}.Widget", package);
        decls.push(public_class(&widget));
        decls.push(public_method(&format!("{}#stable", widget)).with_param("Ljava/lang/String;"));
        if version == 1 {
            decls.push(public_method(&format!("{}#legacy", widget)));
        } else {
            decls.push(public_method(&format!("{}#fresh", widget)).returning("I"));
        }
        let ret = if version == 1 { "Ljava/util/List;" } else { "Ljava/util/ArrayList;" };
        decls.push(public_method(&format!("{}#items", widget)).returning(ret));
        decls.push(
            RawDeclaration::field(format!("{}#cache", widget), "Ljava/util/Map;")
                .with_modifiers([Modifier::Private]),
        );
    }
    ArtifactInput::new(name, decls)
}

/// Build a snapshot directly, asserting nothing was rejected
#[allow(dead_code)]
pub fn snapshot(artifact: &str, declarations: Vec<RawDeclaration>) -> Snapshot {
    let output = build(artifact, &declarations, &BuildOptions::default()).expect("build failed");
    assert!(output.rejected.is_empty(), "unexpected rejections: {:?}", output.rejected);
    output.snapshot
}
