//! Table and JSON output for query results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use agrodash_api::Endpoint;
use agrodash_core::{
    Activity, DashboardMetric, GeneratedReport, InventoryItem, ModuleComparison, MonthlyIncome,
    FarmModule, ProductionSummary, ReportesTask, Task, WeatherData, WorkerSummary,
};
use agrodash_dashboard::{keys, DashboardSnapshot};
use agrodash_query::QueryView;

/// Collects sections and prints them as tables, or as one JSON object at the end.
pub struct Output {
    json: bool,
    sections: Map<String, Value>,
    failures: usize,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            sections: Map::new(),
            failures: 0,
        }
    }

    /// Print one query result, or its fallback line when it failed.
    pub fn section<T, F>(&mut self, name: &str, view: &QueryView<T>, table: F)
    where
        T: Serialize,
        F: FnOnce(&T),
    {
        if let Some(data) = &view.data {
            if self.json {
                let value = serde_json::to_value(&**data)
                    .unwrap_or_else(|e| json!({ "error": e.to_string() }));
                self.sections.insert(name.to_string(), value);
            } else {
                println!("== {}", name);
                table(&**data);
                println!();
            }
            return;
        }

        let reason = match &view.error {
            Some(err) => {
                self.failures += 1;
                err.to_string()
            }
            None => "still loading".to_string(),
        };

        if self.json {
            self.sections
                .insert(name.to_string(), json!({ "error": reason }));
        } else {
            println!("{}: unavailable ({})", name, reason);
            println!();
        }
    }

    /// Print every section of a dashboard snapshot.
    pub fn snapshot(&mut self, snapshot: &DashboardSnapshot) {
        self.section("metrics", &snapshot.metrics, |items| metrics(items));
        self.section("production_summary", &snapshot.production_summary, |items| {
            production(items)
        });
        self.section("inventory", &snapshot.inventory, |items| inventory(items));
        self.section("tasks", &snapshot.tasks, |items| tasks(items));
        self.section("workers", &snapshot.workers, |items| workers(items));
        self.section("activities", &snapshot.activities, |items| activities(items));
        self.section("weather", &snapshot.weather, weather);
        self.section("monthly_income", &snapshot.monthly_income, |items| income(items));
        self.section("module_comparison", &snapshot.module_comparison, |items| {
            modules(items)
        });
        self.section("generated_reports", &snapshot.generated_reports, |items| {
            reports(items)
        });
        self.section("reportes_tasks", &snapshot.reportes_tasks, |items| {
            reportes_tasks(items)
        });
    }

    /// Flush JSON output.
    pub fn finish(&self) -> serde_json::Result<()> {
        if self.json {
            let output = Value::Object(self.sections.clone());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Ok(())
    }

    /// Number of sections whose query failed.
    pub fn failures(&self) -> usize {
        self.failures
    }
}

pub fn metrics(items: &[DashboardMetric]) {
    println!("{:<20}  {:>12}  {:<4}  {}", "METRIC", "VALUE", "UNIT", "CHANGE");
    println!("{}", "-".repeat(52));
    for m in items {
        println!(
            "{:<20}  {:>12.0}  {:<4}  {} {:+.1}%",
            m.title,
            m.value,
            m.unit,
            m.trend.symbol(),
            m.change_pct
        );
    }
}

pub fn production(items: &[ProductionSummary]) {
    println!("{:<14}  {:<10}  {:>10}  {:<4}  {}", "MODULE", "PRODUCT", "QUANTITY", "UNIT", "CHANGE");
    println!("{}", "-".repeat(56));
    for p in items {
        println!(
            "{:<14}  {:<10}  {:>10.0}  {:<4}  {:+.1}%",
            p.module, p.product, p.quantity, p.unit, p.change_pct
        );
    }
}

pub fn inventory(items: &[InventoryItem]) {
    println!("{:<8}  {:<22}  {:<14}  {:>14}  {}", "ID", "NAME", "CATEGORY", "STOCK", "STATUS");
    println!("{}", "-".repeat(74));
    for item in items {
        let stock = format!("{} {}", item.quantity, item.unit);
        let restock = if item.status.needs_restock() { "  (restock)" } else { "" };
        println!(
            "{:<8}  {:<22}  {:<14}  {:>14}  {}{}",
            item.id, item.name, item.category, stock, item.status, restock
        );
    }
}

/// Keep only the tasks of one module. Errors and loading views pass through.
pub fn filter_tasks(view: &QueryView<Vec<Task>>, module: FarmModule) -> QueryView<Vec<Task>> {
    let mut filtered = view.clone();
    filtered.data = view.data.as_ref().map(|tasks| {
        Arc::new(
            tasks
                .iter()
                .filter(|task| task.module == module)
                .cloned()
                .collect(),
        )
    });
    filtered
}

pub fn tasks(items: &[Task]) {
    let today = Utc::now().date_naive();
    println!("{:<6}  {:<32}  {:<12}  {:<10}  {:<6}  {}", "ID", "TITLE", "ASSIGNEE", "DUE", "PRIO", "STATUS");
    println!("{}", "-".repeat(86));
    for t in items {
        let overdue = if t.is_overdue(today) { "  (overdue)" } else { "" };
        println!(
            "{:<6}  {:<32}  {:<12}  {:<10}  {:<6}  {}{}",
            t.id, t.title, t.assignee, t.due_date, t.priority, t.status, overdue
        );
    }
}

pub fn workers(items: &[WorkerSummary]) {
    println!("{:<6}  {:<14}  {:<12}  {:<12}  {}", "ID", "NAME", "ROLE", "MODULE", "TASKS");
    println!("{}", "-".repeat(66));
    for w in items {
        let tasks = format!(
            "{}/{} ({:.0}%)",
            w.tasks_completed,
            w.tasks_completed + w.tasks_pending,
            w.completion_pct()
        );
        println!("{:<6}  {:<14}  {:<12}  {:<12}  {}", w.id, w.name, w.role, w.module, tasks);
    }
}

pub fn activities(items: &[Activity]) {
    for a in items {
        println!("{}  {:<12}  {}", format_timestamp(&a.timestamp), a.user, a.description);
    }
}

pub fn weather(data: &WeatherData) {
    println!("  Location:      {}", data.location);
    println!("  Temperature:   {:.1} °C", data.temperature_c);
    println!("  Humidity:      {:.0}%", data.humidity_pct);
    println!("  Wind:          {:.0} km/h", data.wind_kmh);
    println!("  Precipitation: {:.1} mm", data.precipitation_mm);

    if !data.forecast.is_empty() {
        println!("  Forecast:");
        for day in &data.forecast {
            println!(
                "    - {}  {:>4.0}° / {:>4.0}°  {:?}",
                day.day, day.min_c, day.max_c, day.condition
            );
        }
    }
}

pub fn income(items: &[MonthlyIncome]) {
    println!("{:<5}  {:>12}  {:>12}  {:>12}", "MONTH", "INCOME", "EXPENSES", "PROFIT");
    println!("{}", "-".repeat(48));
    for m in items {
        println!(
            "{:<5}  {:>12.2}  {:>12.2}  {:>12.2}",
            m.month,
            m.income,
            m.expenses,
            m.profit()
        );
    }
}

pub fn modules(items: &[ModuleComparison]) {
    println!("{:<14}  {:>12}  {:>12}  {:>8}  {:>8}", "MODULE", "INCOME", "EXPENSES", "MARGIN", "SHARE");
    println!("{}", "-".repeat(62));
    for m in items {
        println!(
            "{:<14}  {:>12.2}  {:>12.2}  {:>7.1}%  {:>7.1}%",
            m.module,
            m.income,
            m.expenses,
            m.margin_pct(),
            m.production_share_pct
        );
    }
}

pub fn reports(items: &[GeneratedReport]) {
    println!("{:<36}  {:<24}  {:<6}  {:>8}  {}", "ID", "TITLE", "FORMAT", "SIZE", "GENERATED");
    println!("{}", "-".repeat(100));
    for r in items {
        println!(
            "{:<36}  {:<24}  {:<6}  {:>6}KB  {}",
            r.id,
            r.title,
            format!("{:?}", r.format).to_lowercase(),
            r.size_kb,
            format_timestamp(&r.generated_at)
        );
    }
}

pub fn reportes_tasks(items: &[ReportesTask]) {
    println!("{:<6}  {:<32}  {:<10}  {:<10}  {}", "ID", "TITLE", "SCHEDULE", "NEXT RUN", "ENABLED");
    println!("{}", "-".repeat(76));
    for t in items {
        println!(
            "{:<6}  {:<32}  {:<10}  {:<10}  {}",
            t.id,
            t.title,
            format!("{:?}", t.schedule).to_lowercase(),
            t.next_run,
            if t.enabled { "yes" } else { "no" }
        );
    }
}

pub fn endpoints() {
    println!("{:<20}  {}", "ENDPOINT", "QUERY KEY");
    println!("{}", "-".repeat(48));
    for endpoint in Endpoint::ALL {
        let key = keys::for_endpoint(endpoint)
            .map(|key| key.to_string())
            .unwrap_or_else(|| "(mutation)".to_string());
        println!("{:<20}  {}", endpoint, key);
    }
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}
