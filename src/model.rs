use crate::{error::ModelError, features::FeatureVector};
use serde::Deserialize;
use std::{fs, path::Path};

#[cfg(feature = "torch")]
use tch::{kind::Kind, CModule, Device, Tensor};

// ---------- Artifact layout ----------

/// The bundle keeps the estimator and the feature names it was trained on in
/// one file so they can never be loaded apart.
#[derive(Deserialize)]
struct BundleJson {
    feature_names: Vec<String>,
    estimator: EstimatorJson,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EstimatorJson {
    TreeEnsemble(TreeEnsemble),
    #[cfg(feature = "torch")]
    Torchscript { path: std::path::PathBuf },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        #[serde(default)]
        default_left: bool,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {tree_idx} has no nodes")));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split { feature, left, right, .. } = *node {
                if feature >= n_features {
                    return Err(ModelError::Invalid(format!(
                        "tree {tree_idx} node {i} splits on feature {feature}, only {n_features} exist"
                    )));
                }
                // children must point forward so evaluation always terminates
                for child in [left, right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(ModelError::Invalid(format!(
                            "tree {tree_idx} node {i} has invalid child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    default_left,
                    left,
                    right,
                } => {
                    let v = x[feature];
                    let go_left = if v.is_nan() { default_left } else { v <= threshold };
                    idx = if go_left { left } else { right };
                }
            }
        }
    }
}

/// Gradient-boosted regression trees: `base_score + Σ leaf values`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.leaf_value(x)).sum::<f64>()
    }
}

#[cfg(feature = "torch")]
pub struct TorchRegressor {
    model: CModule,
    device: Device,
}

#[cfg(feature = "torch")]
impl TorchRegressor {
    fn load(path: &Path) -> Result<Self, ModelError> {
        let device = Device::Cpu;
        let model = CModule::load_on_device(path, device)
            .map_err(|e| ModelError::Invalid(format!("failed to load TorchScript {}: {e}", path.display())))?;
        Ok(Self { model, device })
    }

    fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        let xs: Vec<f32> = x.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&xs)
            .reshape([1, xs.len() as i64])
            .to_device(self.device);
        let out = self
            .model
            .forward_ts(&[input])
            .map_err(|e| ModelError::Inference(e.to_string()))?
            .to_kind(Kind::Double)
            .view([-1]);
        if out.size() != [1] {
            return Err(ModelError::Inference(format!(
                "expected a single output, got shape {:?}",
                out.size()
            )));
        }
        Ok(out.double_value(&[0]))
    }
}

pub enum Estimator {
    Trees(TreeEnsemble),
    #[cfg(feature = "torch")]
    Torch(TorchRegressor),
}

// ---------- Loaded bundle ----------

pub struct ModelBundle {
    feature_names: Vec<String>,
    estimator: Estimator,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("feature_names", &self.feature_names)
            .field("estimator", &self.describe())
            .finish()
    }
}

impl ModelBundle {
    pub fn new(feature_names: Vec<String>, estimator: Estimator) -> Result<Self, ModelError> {
        if feature_names.is_empty() {
            return Err(ModelError::Invalid("feature_names is empty".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = feature_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(ModelError::Invalid(format!("duplicate feature name {dup:?}")));
        }
        if let Estimator::Trees(ensemble) = &estimator {
            if ensemble.trees.is_empty() {
                return Err(ModelError::Invalid("tree ensemble has no trees".to_string()));
            }
            for (i, tree) in ensemble.trees.iter().enumerate() {
                tree.validate(i, feature_names.len())?;
            }
        }
        Ok(Self {
            feature_names,
            estimator,
        })
    }

    /// Authoritative input order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn describe(&self) -> String {
        match &self.estimator {
            Estimator::Trees(e) => format!("tree_ensemble({} trees)", e.trees.len()),
            #[cfg(feature = "torch")]
            Estimator::Torch(_) => "torchscript".to_string(),
        }
    }

    /// Predicted delivery time in minutes. The vector must have been built
    /// against this bundle's feature names.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if features.columns() != self.feature_names.as_slice() {
            return Err(ModelError::SchemaMismatch(format!(
                "got {} columns, model expects {}",
                features.len(),
                self.feature_names.len()
            )));
        }
        let x = features.values();
        let y = match &self.estimator {
            Estimator::Trees(e) => e.predict(x),
            #[cfg(feature = "torch")]
            Estimator::Torch(m) => m.predict(x)?,
        };
        if !y.is_finite() {
            return Err(ModelError::Inference(format!("non-finite prediction {y}")));
        }
        Ok(y)
    }

    /// Forward pass on an all-zero vector to confirm the estimator is usable.
    pub fn warmup(&self) -> Result<f64, ModelError> {
        self.predict(&FeatureVector::zeros(&self.feature_names))
    }
}

pub fn load_model(path: impl AsRef<Path>) -> Result<ModelBundle, ModelError> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bundle: BundleJson = serde_json::from_str(&txt).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let estimator = match bundle.estimator {
        EstimatorJson::TreeEnsemble(e) => Estimator::Trees(e),
        #[cfg(feature = "torch")]
        EstimatorJson::Torchscript { path: module } => {
            let module = path.parent().unwrap_or_else(|| Path::new(".")).join(module);
            Estimator::Torch(TorchRegressor::load(&module)?)
        }
    };
    ModelBundle::new(bundle.feature_names, estimator)
}

/// Display form used on the prediction page; the raw value is kept as is.
pub fn format_minutes(minutes: f64) -> String {
    format!("{minutes:.1} minutes")
}
