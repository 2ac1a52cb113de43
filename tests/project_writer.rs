//! Integration tests for project generation against the fixture asset tree

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use hlsop::{
    write_project, IoType, Layer, Model, ModelConfig, Precision, PrecisionType, ProjectWriter,
    StaticToolchain, TemplateRegistry, WriterConfig, WriterError,
};

fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/templates")
}

fn writer() -> ProjectWriter {
    let registry = TemplateRegistry::with_base_path(assets_dir()).expect("Should scan assets");
    ProjectWriter::new(registry).with_toolchain(StaticToolchain::new(
        vec!["-I/opt/tf/include", "-D_GLIBCXX_USE_CXX11_ABI=1"],
        vec!["-L/opt/tf", "-l:libtensorflow_framework.so.2"],
    ))
}

/// The two-layer Input + Dense model used by most tests
fn dense_model(output_dir: &Path) -> Model {
    Model::new(
        ModelConfig::new(output_dir, "myproj")
            .with_stamp("A1")
            .with_io_type(IoType::Parallel),
    )
    .with_layer(Layer::new("InputLayer", "input_1"))
    .with_layer(
        Layer::new("Dense", "dense")
            .with_type(PrecisionType::new("ap_fixed16", Precision::fixed(16, 6)))
            .with_config_text("struct config2 { ... };\n"),
    )
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

fn output() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let out = dir.path().join("myproj_prj");
    (dir, out)
}

#[test]
fn test_end_to_end_dense_operator_source() {
    let (_dir, out) = output();
    let project = writer().assemble(&dense_model(&out)).expect("Should write");

    assert_eq!(project.operator_source, out.join("myproj_op.cpp"));
    let source = read(&project.operator_source);

    assert_eq!(source.matches("typedef ap_fixed<16,6> ap_fixed16;").count(), 1);
    assert!(source.contains("#define NAME \"myproj_a1\"\n"));
    assert!(source.contains("typedef config2 hconfig;\n"));
    assert!(source.contains("#define IO_TYPE 1 // == io_parallel\n"));
    assert!(source.contains("// dense\nstruct config2 { ... };\n"));
    assert!(!source.contains("//hls4ml insert"));
}

#[test]
fn test_operator_source_passthrough_lines_unchanged() {
    let (_dir, out) = output();
    let project = writer().assemble(&dense_model(&out)).expect("Should write");
    let source = read(&project.operator_source);
    let template = read(&assets_dir().join("vivado_train/dense_op.cpp"));

    // Every non-marker template line appears in the output, in order
    let mut rest = source.as_str();
    for line in template.split_inclusive('\n') {
        if line.contains("//hls4ml insert") {
            continue;
        }
        let pos = rest
            .find(line)
            .unwrap_or_else(|| panic!("missing passthrough line {:?}", line));
        rest = &rest[pos + line.len()..];
    }
}

#[test]
fn test_shared_types_are_defined_once() {
    let (_dir, out) = output();
    let model = Model::new(ModelConfig::new(&out, "myproj").with_stamp("A1"))
        .with_layer(
            Layer::new("InputLayer", "input_1")
                .with_type(PrecisionType::new("input_t", Precision::fixed(16, 6))),
        )
        .with_layer(
            Layer::new("Dense", "dense")
                .with_type(PrecisionType::new("input_t", Precision::fixed(8, 3)))
                .with_type(PrecisionType::new("result_t", Precision::fixed(18, 8)))
                .with_config_text("struct config2 {};\n"),
        )
        .with_layer(
            Layer::new("Activation", "relu")
                .with_type(PrecisionType::new("result_t", Precision::fixed(18, 8)))
                .with_config_text("struct relu_config3 {};\n"),
        );

    writer().assemble(&model).expect("Should write");
    let source = read(&out.join("myproj_op.cpp"));

    assert_eq!(source.matches(" input_t;").count(), 1);
    assert_eq!(source.matches(" result_t;").count(), 1);
    assert!(source.contains("typedef ap_fixed<16,6> input_t;\ntypedef ap_fixed<18,8> result_t;\n"));
    assert!(source.contains("// dense\nstruct config2 {};\n// relu\nstruct relu_config3 {};\n"));
    assert!(source.contains("typedef config2 hconfig;"));
}

#[test]
fn test_streamed_io_type() {
    let (_dir, out) = output();
    let mut model = dense_model(&out);
    model.config.io_type = IoType::Streamed;

    writer().assemble(&model).expect("Should write");
    let source = read(&out.join("myproj_op.cpp"));
    assert!(source.contains("#define IO_TYPE 2 // == io_stream\n"));
}

#[test]
fn test_layer_without_config_has_no_typedef() {
    let (_dir, out) = output();
    let model = Model::new(ModelConfig::new(&out, "up").with_stamp("B2"))
        .with_layer(Layer::new("InputLayer", "input_1"))
        .with_layer(Layer::new("UpSampling2D", "up2d"));

    writer().assemble(&model).expect("Should write");
    let source = read(&out.join("up_op.cpp"));
    assert!(!source.contains("hconfig"));
    assert!(source.contains("#define NAME \"up_b2\"\n"));
}

#[test]
fn test_build_script_without_parallelism() {
    let (_dir, out) = output();
    let mut model = dense_model(&out);
    model.config.parallel = Some(false);

    let project = writer().assemble(&model).expect("Should write");
    insta::assert_snapshot!(read(&project.build_script), @r###"
    #!/bin/bash

    CC=g++
    OP_SRC=myproj_op.cpp
    TARGET_LIB=myproj_op-A1.so
    TF_CFLAGS="-I/opt/tf/include -D_GLIBCXX_USE_CXX11_ABI=1"
    TF_LFLAGS="-L/opt/tf -l:libtensorflow_framework.so.2"
    OMPFLAGS=
    CFLAGS="-O3 -fPIC -std=c++14"

    ${CC} ${CFLAGS} ${OMPFLAGS} -shared ${OP_SRC} -o ${TARGET_LIB} ${TF_CFLAGS} ${TF_LFLAGS}
    "###);
}

#[test]
fn test_build_script_keeps_parallelism_by_default() {
    let (_dir, out) = output();
    let project = writer().assemble(&dense_model(&out)).expect("Should write");
    let script = read(&project.build_script);

    assert!(script.contains("\nOMPFLAGS=-fopenmp\n"));
    assert!(script.contains("\nOP_SRC=myproj_op.cpp\n"));
    assert!(script.contains("\nTARGET_LIB=myproj_op-A1.so\n"));
}

#[test]
fn test_support_library_layout() {
    let (_dir, out) = output();
    let project = writer().assemble(&dense_model(&out)).expect("Should write");

    assert_eq!(
        project.nnet_utils,
        vec![
            out.join("nnet_utils/nnet_common.h"),
            out.join("nnet_utils/nnet_dense.h"),
        ]
    );
    assert!(!out.join("nnet_utils/README.txt").exists());
    assert!(out.join("ap_types/ap_fixed.h").is_file());
    assert!(out.join("ap_types/ap_int.h").is_file());
    assert!(out.join("ap_types/etc/ap_private.h").is_file());
    assert_eq!(
        project.extra_headers,
        vec![out.join("op_utils.h"), out.join("io_type.h")]
    );
    assert_eq!(
        read(&out.join("io_type.h")),
        read(&assets_dir().join("vivado_train/io_type.h"))
    );
}

#[test]
fn test_rewrite_merges_nnet_utils_and_replaces_ap_types() {
    let (_dir, out) = output();
    let model = dense_model(&out);
    let writer = writer();
    writer.assemble(&model).expect("First write");

    fs::write(out.join("nnet_utils/nnet_custom.h"), "// user header").unwrap();
    fs::write(out.join("nnet_utils/nnet_dense.h"), "// edited").unwrap();
    fs::write(out.join("ap_types/stale.h"), "// stale").unwrap();
    fs::write(out.join("op_utils.h"), "// edited").unwrap();

    writer.assemble(&model).expect("Second write");

    assert_eq!(read(&out.join("nnet_utils/nnet_custom.h")), "// user header");
    assert_eq!(
        read(&out.join("nnet_utils/nnet_dense.h")),
        read(&assets_dir().join("vivado/nnet_utils/nnet_dense.h"))
    );
    assert!(!out.join("ap_types/stale.h").exists());
    assert_eq!(
        read(&out.join("op_utils.h")),
        read(&assets_dir().join("vivado_train/op_utils.h"))
    );
}

#[test]
fn test_unknown_layer_class_writes_no_operator_source() {
    let (_dir, out) = output();
    let model = Model::new(ModelConfig::new(&out, "myproj").with_stamp("A1"))
        .with_layer(Layer::new("InputLayer", "input_1"))
        .with_layer(Layer::new("Conv2D", "conv"));

    let err = writer().assemble(&model).unwrap_err();
    match err {
        WriterError::NoTemplateForLayer { class_name, .. } => assert_eq!(class_name, "Conv2D"),
        other => panic!("unexpected error: {other}"),
    }
    // Earlier steps are not rolled back
    assert!(out.is_dir());
    assert!(!out.join("myproj_op.cpp").exists());
}

#[test]
fn test_malformed_config_writes_no_operator_source() {
    let (_dir, out) = output();
    let model = Model::new(ModelConfig::new(&out, "myproj").with_stamp("A1"))
        .with_layer(Layer::new("InputLayer", "input_1"))
        .with_layer(Layer::new("Dense", "dense").with_config_text("typedef int foo;\n"));

    let err = writer().assemble(&model).unwrap_err();
    assert!(matches!(err, WriterError::MalformedConfig { ref layer, .. } if layer == "dense"));
    assert!(!out.join("myproj_op.cpp").exists());
}

#[test]
fn test_model_without_main_layer() {
    let (_dir, out) = output();
    let model = Model::new(ModelConfig::new(&out, "myproj"))
        .with_layer(Layer::new("InputLayer", "input_1"));
    assert!(matches!(
        writer().assemble(&model),
        Err(WriterError::NoMainLayer)
    ));
}

#[test]
fn test_write_project_from_description() {
    let (_dir, out) = output();
    let description = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/models/dense.toml");
    let mut model = Model::from_file(&description).expect("Should load");
    model.config.output_dir = out.clone();

    let config = WriterConfig::new()
        .with_assets_dir(assets_dir())
        .with_flags("-I/tf", "-L/tf");
    let project = write_project(&model, &config).expect("Should write");

    let source = read(&project.operator_source);
    assert!(source.contains(
        "typedef ap_fixed<16,6> input_t;\n\
         typedef ap_fixed<16,6> ap_fixed16;\n\
         typedef ap_fixed<16,6,AP_RND,AP_SAT> result_t;\n\
         #define N_IN 4\n\
         #define N_OUT 2\n\
         \n#define NAME \"myproj_a1\"\n"
    ));
    assert!(source.contains("typedef config2 hconfig;\n"));

    let script = read(&project.build_script);
    assert!(script.contains("TF_CFLAGS=\"-I/tf\"\n"));
    assert!(script.contains("TF_LFLAGS=\"-L/tf\"\n"));
}
