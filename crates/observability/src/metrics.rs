//! 查询指标收集模块
//!
//! 记录每个 provider 的查询结果、延迟，以及 chain 的耗尽次数。

use std::collections::HashMap;

use contracts::FailureClass;
use metrics::{counter, gauge, histogram};

/// 记录单次 provider 查询结果
///
/// `status` 为 `success` 或 `FailureClass::as_str()` 的取值。
pub fn record_lookup(provider: &str, operation: &str, status: &str) {
    counter!(
        "geochain_lookups_total",
        "provider" => provider.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录 provider 查询延迟 (毫秒)
pub fn record_lookup_latency_ms(provider: &str, latency_ms: f64) {
    histogram!(
        "geochain_lookup_latency_ms",
        "provider" => provider.to_string()
    )
    .record(latency_ms);
}

/// 记录因配额耗尽而被跳过的 provider
pub fn record_provider_skipped(provider: &str, operation: &str) {
    counter!(
        "geochain_provider_skipped_total",
        "provider" => provider.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// 记录 chain 所有 provider 均失败
pub fn record_chain_exhausted(operation: &str, attempted: usize) {
    counter!(
        "geochain_chain_exhausted_total",
        "operation" => operation.to_string()
    )
    .increment(1);
    histogram!("geochain_chain_exhausted_attempts").record(attempted as f64);
}

/// 记录当前超出配额的 provider 数量
pub fn record_providers_over_quota(count: usize) {
    gauge!("geochain_providers_over_quota").set(count as f64);
}

/// 查询指标聚合器
///
/// 在内存中聚合批量查询结果，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct LookupStatsAggregator {
    /// 总查询数
    pub total_lookups: u64,

    /// 成功数
    pub succeeded: u64,

    /// 失败数 (含凭证错误)
    pub failed: u64,

    /// 各 provider 成功应答次数
    pub winners: HashMap<String, u64>,

    /// 各失败类别次数
    pub failure_classes: HashMap<FailureClass, u64>,

    /// 返回结果条数统计
    pub result_stats: RunningStats,

    /// 延迟统计 (毫秒)
    pub latency_stats: RunningStats,
}

impl LookupStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录成功查询
    pub fn record_success(&mut self, provider: &str, results: usize, latency_ms: f64) {
        self.total_lookups += 1;
        self.succeeded += 1;
        *self.winners.entry(provider.to_string()).or_insert(0) += 1;
        self.result_stats.push(results as f64);
        self.latency_stats.push(latency_ms);
    }

    /// 记录失败查询
    pub fn record_failure(&mut self, class: FailureClass, latency_ms: f64) {
        self.total_lookups += 1;
        self.failed += 1;
        *self.failure_classes.entry(class).or_insert(0) += 1;
        self.latency_stats.push(latency_ms);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> LookupSummary {
        let mut winners: Vec<_> = self
            .winners
            .iter()
            .map(|(provider, count)| (provider.clone(), *count))
            .collect();
        winners.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        LookupSummary {
            total_lookups: self.total_lookups,
            succeeded: self.succeeded,
            failed: self.failed,
            success_rate: if self.total_lookups > 0 {
                self.succeeded as f64 / self.total_lookups as f64 * 100.0
            } else {
                0.0
            },
            winners,
            credential_failures: self
                .failure_classes
                .get(&FailureClass::InvalidCredentials)
                .copied()
                .unwrap_or(0),
            results_per_lookup: StatsSummary::from(&self.result_stats),
            latency_ms: StatsSummary::from(&self.latency_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 查询摘要
#[derive(Debug, Clone, Default)]
pub struct LookupSummary {
    pub total_lookups: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub success_rate: f64,
    /// (provider, wins)，按次数降序
    pub winners: Vec<(String, u64)>,
    pub credential_failures: u64,
    pub results_per_lookup: StatsSummary,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for LookupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Lookup Summary ===")?;
        writeln!(f, "Total lookups: {}", self.total_lookups)?;
        writeln!(
            f,
            "Succeeded: {} ({:.2}%)",
            self.succeeded, self.success_rate
        )?;
        writeln!(f, "Failed: {}", self.failed)?;
        if self.credential_failures > 0 {
            writeln!(f, "Credential failures: {}", self.credential_failures)?;
        }
        writeln!(f, "Results per lookup: {}", self.results_per_lookup)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.winners.is_empty() {
            writeln!(f, "Answered by:")?;
            for (provider, count) in &self.winners {
                writeln!(f, "  {}: {}", provider, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
