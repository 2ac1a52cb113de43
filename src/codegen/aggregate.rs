//! Per-layer text collected into the operator source

use crate::model::Layer;

/// Collect the config blocks of all layers, each headed by a comment
///
/// Layers without config text contribute nothing. Each block is terminated
/// by a newline so consecutive blocks never share a line.
pub fn collect_configs(layers: &[Layer]) -> String {
    let mut out = String::new();
    for layer in layers {
        let Some(config) = layer.config_text.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        out.push_str("// ");
        out.push_str(&layer.name);
        out.push('\n');
        out.push_str(config);
        if !config.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Concatenate the `#define` blocks of all layers verbatim
pub fn collect_defines(layers: &[Layer]) -> String {
    layers
        .iter()
        .filter_map(|layer| layer.op_defines_text.as_deref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_configs_in_graph_order() {
        let layers = vec![
            Layer::new("InputLayer", "input_1"),
            Layer::new("Dense", "dense").with_config_text("struct config2 {};\n"),
            Layer::new("Activation", "relu").with_config_text("struct relu_config3 {};"),
            Layer::new("Dense", "empty").with_config_text(""),
        ];

        assert_eq!(
            collect_configs(&layers),
            "// dense\nstruct config2 {};\n// relu\nstruct relu_config3 {};\n"
        );
    }

    #[test]
    fn test_collect_configs_none() {
        assert_eq!(collect_configs(&[Layer::new("InputLayer", "input_1")]), "");
    }

    #[test]
    fn test_collect_defines_verbatim() {
        let layers = vec![
            Layer::new("Dense", "a").with_op_defines_text("#define N_IN 4\n"),
            Layer::new("Dense", "b"),
            Layer::new("Dense", "c").with_op_defines_text("#define N_OUT 2"),
        ];
        assert_eq!(collect_defines(&layers), "#define N_IN 4\n#define N_OUT 2");
    }
}
