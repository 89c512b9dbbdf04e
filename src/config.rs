// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 计数器配置 - 通过JSON文件调整参数

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::detection::PersonFilter;
use crate::error::{CounterError, Result};

/// 计数器参数配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    // === 跟踪参数 ===
    pub match_threshold: u32, // 匹配距离阈值(像素, 每个轴独立)
    pub line_ratio: f64,      // 计数线位置 = 帧高 × 比例

    // === 检测过滤 ===
    pub person_class_id: u32, // COCO: 0=person
    pub min_confidence: f32,  // 置信度下限(严格大于)

    // === 统计 ===
    pub stats_interval_secs: u64, // 吞吐统计日志间隔
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            match_threshold: 50,
            line_ratio: 0.75,
            person_class_id: 0,
            min_confidence: 0.5,
            stats_interval_secs: 1,
        }
    }
}

impl CounterConfig {
    /// 从JSON文件加载配置
    ///
    /// 文件不存在时写出默认配置; 解析失败时回退到默认值
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    info!("✅ 配置已从 {} 加载", path.display());
                    config
                }
                Err(e) => {
                    warn!("⚠️  配置文件解析失败: {}, 使用默认值", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("📝 配置文件不存在,创建默认配置...");
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    warn!("❌ 保存配置失败: {}", e);
                }
                config
            }
        }
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        info!("💾 配置已保存到 {}", path.as_ref().display());
        Ok(())
    }

    /// 参数合法性检查
    pub fn validate(&self) -> Result<()> {
        if self.match_threshold == 0 {
            return Err(CounterError::config("match_threshold must be positive"));
        }
        if !(self.line_ratio > 0.0 && self.line_ratio <= 1.0) {
            return Err(CounterError::config(format!(
                "line_ratio must be in (0, 1], got {}",
                self.line_ratio
            )));
        }
        if !(0.0..1.0).contains(&self.min_confidence) {
            return Err(CounterError::config(format!(
                "min_confidence must be in [0, 1), got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }

    pub fn person_filter(&self) -> PersonFilter {
        PersonFilter {
            class_id: self.person_class_id,
            min_confidence: self.min_confidence,
        }
    }

    /// 打印当前配置
    pub fn print_summary(&self) {
        info!("🎛️  当前计数器配置:");
        info!("  匹配阈值: {}px", self.match_threshold);
        info!("  计数线位置: {:.2} × 帧高", self.line_ratio);
        info!(
            "  检测过滤: class={} conf>{:.2}",
            self.person_class_id, self.min_confidence
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("people-counter-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_config_default() {
        let config = CounterConfig::default();
        assert_eq!(config.match_threshold, 50);
        assert_eq!(config.line_ratio, 0.75);
        assert_eq!(config.person_class_id, 0);
        assert_eq!(config.min_confidence, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_writes_defaults() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let config = CounterConfig::load(&path);
        assert_eq!(config, CounterConfig::default());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_partial_and_malformed() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"match_threshold": 30}"#).unwrap();
        let config = CounterConfig::load(&path);
        assert_eq!(config.match_threshold, 30);
        assert_eq!(config.line_ratio, 0.75);

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(CounterConfig::load(&path), CounterConfig::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CounterConfig::default();
        config.match_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = CounterConfig::default();
        config.line_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = CounterConfig::default();
        config.min_confidence = 1.0;
        assert!(config.validate().is_err());
    }
}
