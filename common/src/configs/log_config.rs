use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: Option<String>,                   // 日志输出格式: plain或json
    pub components: Option<HashMap<String, String>>, // 其他组件的日志级别
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: None,
            components: None,
        }
    }
}

impl LogConfig {
    /// 构建 EnvFilter 指令字符串，例如 `info,tower_http=debug`
    pub fn filter_directives(&self) -> String {
        let mut filter_parts = vec![self.level.clone()];

        if let Some(components) = &self.components {
            let mut components: Vec<_> = components.iter().collect();
            components.sort();
            for (component, level) in components {
                filter_parts.push(format!("{}={}", component, level));
            }
        }

        filter_parts.join(",")
    }
}
