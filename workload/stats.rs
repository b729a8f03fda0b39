use serde::{Deserialize, Serialize};

/// 计时样本的均值与总体标准差（毫秒）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    /// 汇总样本，空样本返回 None
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        Some(Summary {
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
