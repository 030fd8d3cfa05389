//! YAML-driven callback sets.

use vsr_core::Tensor;
use vsr_train::{CallbackConfig, HookArgs, LrState};

#[test]
fn test_yaml_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        r#"
feature:
  - {{ type: noise, sigma: 0.0 }}
  - {{ type: gray }}
output:
  - {{ type: residual }}
  - {{ type: save, dir: "{}" }}
lr: {{ method: stair, lr: 0.1, decay_step: 5, decay_rate: 0.1 }}
metrics:
  - {{ type: psnr }}
"#,
        dir.path().display()
    );
    let callbacks = CallbackConfig::from_yaml_str(&yaml).unwrap().build().unwrap();

    let img = Tensor::new(vec![1, 2, 2, 3], vec![50.0; 12]).unwrap();
    let feature = callbacks.on_feature(img).unwrap();
    assert_eq!(feature.shape(), &[1, 2, 2, 1]);
    assert!(feature.data().iter().all(|&v| v == 50.0));

    let args = HookArgs::new().with_input(feature.clone()).with_name("cfg");
    let residual = Tensor::new(vec![1, 2, 2, 1], vec![10.0; 4]).unwrap();
    let out = callbacks.on_output(vec![residual.into()], &args).unwrap();
    assert_eq!(out[0].as_tensor().unwrap().data(), &[40.0; 4]);
    assert!(dir.path().join("cfg_PR.png").exists());

    let lr = callbacks.learning_rate(&LrState {
        lr: 0.1,
        epochs: 0,
        steps: 7,
    });
    assert!((lr - 0.01).abs() < 1e-12);

    let label = Tensor::new(vec![1, 2, 2, 1], vec![40.0; 4]).unwrap();
    let scores = callbacks.evaluate(&out, &label).unwrap();
    assert!(scores[0].is_infinite());
}

#[test]
fn test_invalid_yaml_reports_error() {
    assert!(CallbackConfig::from_yaml_str("feature: 3").is_err());
    assert!(CallbackConfig::from_yaml_str("unknown_section: []").is_err());
}
