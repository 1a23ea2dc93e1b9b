//! Simulated asynchronous data source.
//!
//! Widget views fetch their dataset when they appear. Every fetch waits for
//! the configured latency and then returns fixed sample records.

use crate::store::{ChartType, WidgetRecord};
use crate::WidgetKind;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Latency of a fetch when none is configured.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Named dataset served by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Customer rows for tables.
    Customers,
    /// Monthly revenue for bar charts.
    Revenue,
    /// Sales over time for line charts.
    Sales,
    /// Customer segments for pie charts.
    Distribution,
    /// Key metrics for stats tiles.
    Metrics,
}

impl Dataset {
    /// All datasets.
    pub const ALL: [Dataset; 5] = [
        Dataset::Customers,
        Dataset::Revenue,
        Dataset::Sales,
        Dataset::Distribution,
        Dataset::Metrics,
    ];
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dataset::Customers => "customers",
            Dataset::Revenue => "revenue",
            Dataset::Sales => "sales",
            Dataset::Distribution => "distribution",
            Dataset::Metrics => "metrics",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Dataset {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customers" => Ok(Dataset::Customers),
            "revenue" => Ok(Dataset::Revenue),
            "sales" => Ok(Dataset::Sales),
            "distribution" => Ok(Dataset::Distribution),
            "metrics" => Ok(Dataset::Metrics),
            _ => Err(FetchError::UnknownDataset(s.to_string())),
        }
    }
}

/// Errors from the data source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No dataset with this name exists.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// The source is offline.
    #[error("data source unavailable while fetching {0}")]
    Unavailable(Dataset),
}

/// Account state of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CustomerStatus {
    /// Ordering regularly.
    Active,
    /// Awaiting verification.
    Pending,
    /// No recent orders.
    Inactive,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Pending => "Pending",
            CustomerStatus::Inactive => "Inactive",
        };
        write!(f, "{}", s)
    }
}

/// One customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer number.
    pub id: u32,
    /// Full name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Account state.
    pub status: CustomerStatus,
    /// Date of the latest order.
    pub last_order: NaiveDate,
    /// Lifetime spend in whole dollars.
    pub total_spent: u32,
}

/// Revenue of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenuePoint {
    /// Month abbreviation.
    pub month: String,
    /// Revenue in dollars.
    pub revenue: u64,
}

/// Sales count on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesPoint {
    /// Sample date.
    pub date: NaiveDate,
    /// Units sold.
    pub sales: u64,
}

/// Share of one customer segment, in percent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Segment name.
    pub category: String,
    /// Percentage of customers.
    pub value: u64,
}

/// A key metric tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    /// Metric name.
    pub name: String,
    /// Formatted current value.
    pub value: String,
    /// Formatted change since last period.
    pub change: String,
    /// Whether the change is an improvement.
    pub is_positive: bool,
}

/// Records of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Records {
    /// Customer rows.
    Customers(Vec<Customer>),
    /// Monthly revenue.
    Revenue(Vec<RevenuePoint>),
    /// Sales over time.
    Sales(Vec<SalesPoint>),
    /// Customer segments.
    Distribution(Vec<Share>),
    /// Key metrics.
    Metrics(Vec<Metric>),
}

impl Records {
    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Records::Customers(v) => v.len(),
            Records::Revenue(v) => v.len(),
            Records::Sales(v) => v.len(),
            Records::Distribution(v) => v.len(),
            Records::Metrics(v) => v.len(),
        }
    }

    /// Returns `true` if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text lines, one per record.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Records::Customers(v) => v
                .iter()
                .map(|c| {
                    format!(
                        "{}\t{}\t{}\t{}\t{}\t${}",
                        c.id, c.name, c.email, c.status, c.last_order, c.total_spent
                    )
                })
                .collect(),
            Records::Revenue(v) => v
                .iter()
                .map(|p| format!("{}\t{}", p.month, p.revenue))
                .collect(),
            Records::Sales(v) => v
                .iter()
                .map(|p| format!("{}\t{}", p.date, p.sales))
                .collect(),
            Records::Distribution(v) => v
                .iter()
                .map(|s| format!("{}\t{}%", s.category, s.value))
                .collect(),
            Records::Metrics(v) => v
                .iter()
                .map(|m| format!("{}\t{}\t{}", m.name, m.value, m.change))
                .collect(),
        }
    }
}

/// Dataset feeding a widget, decided by its kind and chart type.
pub fn dataset_for(record: &WidgetRecord) -> Dataset {
    match record.kind {
        WidgetKind::Table => Dataset::Customers,
        WidgetKind::Stats => Dataset::Metrics,
        WidgetKind::Chart => match record.chart_type() {
            ChartType::Bar => Dataset::Revenue,
            ChartType::Line => Dataset::Sales,
            ChartType::Pie => Dataset::Distribution,
        },
    }
}

/// Source of widget data with simulated network latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSource {
    latency: Duration,
    online: bool,
}

impl Default for DataSource {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

impl DataSource {
    /// Creates a source answering after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            online: true,
        }
    }

    /// Creates a source whose fetches always fail after `latency`.
    pub fn offline(latency: Duration) -> Self {
        Self {
            latency,
            online: false,
        }
    }

    /// Configured latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Fetches a dataset.
    pub async fn fetch(&self, dataset: Dataset) -> Result<Records, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.online {
            return Err(FetchError::Unavailable(dataset));
        }
        tracing::trace!("fetched {}", dataset);
        Ok(sample(dataset))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn customer(
    id: u32,
    name: &str,
    status: CustomerStatus,
    last_order: NaiveDate,
    total_spent: u32,
) -> Customer {
    let first = name.split_whitespace().next().unwrap_or(name).to_lowercase();
    Customer {
        id,
        name: name.to_string(),
        email: format!("{first}@example.com"),
        status,
        last_order,
        total_spent,
    }
}

fn sample(dataset: Dataset) -> Records {
    use CustomerStatus::{Active, Inactive, Pending};

    match dataset {
        Dataset::Customers => Records::Customers(vec![
            customer(1, "John Doe", Active, date(2025, 6, 1), 1240),
            customer(2, "Jane Smith", Active, date(2025, 5, 28), 890),
            customer(3, "Robert Johnson", Inactive, date(2025, 4, 15), 2100),
            customer(4, "Emily Davis", Active, date(2025, 6, 2), 345),
            customer(5, "Michael Wilson", Pending, date(2025, 5, 30), 1560),
            customer(6, "Sarah Taylor", Active, date(2025, 5, 25), 780),
            customer(7, "David Brown", Active, date(2025, 6, 3), 2340),
        ]),
        Dataset::Revenue => Records::Revenue(
            [
                ("Jan", 12_000),
                ("Feb", 15_000),
                ("Mar", 18_000),
                ("Apr", 14_000),
                ("May", 21_000),
                ("Jun", 25_000),
            ]
            .into_iter()
            .map(|(month, revenue)| RevenuePoint {
                month: month.to_string(),
                revenue,
            })
            .collect(),
        ),
        Dataset::Sales => Records::Sales(
            [
                ((1, 1), 420),
                ((1, 15), 480),
                ((2, 1), 550),
                ((2, 15), 520),
                ((3, 1), 680),
                ((3, 15), 720),
                ((4, 1), 750),
                ((4, 15), 790),
                ((5, 1), 860),
                ((5, 15), 940),
                ((6, 1), 980),
            ]
            .into_iter()
            .map(|((m, d), sales)| SalesPoint {
                date: date(2025, m, d),
                sales,
            })
            .collect(),
        ),
        Dataset::Distribution => Records::Distribution(
            [("New", 30), ("Returning", 45), ("Regular", 25)]
                .into_iter()
                .map(|(category, value)| Share {
                    category: category.to_string(),
                    value,
                })
                .collect(),
        ),
        Dataset::Metrics => Records::Metrics(
            [
                ("Total Revenue", "$82,400", "+12%", true),
                ("Active Users", "1,245", "+8%", true),
                ("Conversion Rate", "3.2%", "-0.5%", false),
                ("Avg. Order Value", "$128", "+5%", true),
            ]
            .into_iter()
            .map(|(name, value, change, is_positive)| Metric {
                name: name.to_string(),
                value: value.to_string(),
                change: change.to_string(),
                is_positive,
            })
            .collect(),
        ),
    }
}
