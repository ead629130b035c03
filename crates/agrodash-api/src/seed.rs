//! Seeded farm data served by the mock API.
//!
//! All values are fixed so repeated calls return equal payloads.

use chrono::{DateTime, NaiveDate, Utc};

use agrodash_core::{
    Activity, ActivityId, ActivityKind, DailyForecast, DashboardMetric, FarmModule,
    GeneratedReport, InventoryItem, ModuleComparison, MonthlyIncome, Priority, ProductionSummary,
    ReportFormat, ReportId, ReportKind, ReportSchedule, ReportesTask, Task, TaskId, TaskStatus,
    WeatherCondition, WeatherData, WorkerId, WorkerSummary,
};

/// 2024-06-14 12:00:00 UTC, the reference instant of the seeded data.
const SEED_EPOCH_SECS: i64 = 1_718_366_400;

fn at_offset(minutes_before: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(SEED_EPOCH_SECS - minutes_before * 60, 0).unwrap_or_default()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn metrics() -> Vec<DashboardMetric> {
    vec![
        DashboardMetric::new("produccion_total", "Producción total", 12_450.0, "L", 8.2),
        DashboardMetric::new("ingresos_mes", "Ingresos del mes", 48_920.0, "USD", 12.5),
        DashboardMetric::new("animales_activos", "Animales activos", 1_284.0, "", -2.1),
        DashboardMetric::new("tareas_pendientes", "Tareas pendientes", 23.0, "", 0.0),
    ]
}

pub fn production_summary() -> Vec<ProductionSummary> {
    vec![
        ProductionSummary {
            module: FarmModule::Ganaderia,
            product: "Leche".to_string(),
            quantity: 8_450.0,
            unit: "L".to_string(),
            change_pct: 5.4,
        },
        ProductionSummary {
            module: FarmModule::Agricultura,
            product: "Maíz".to_string(),
            quantity: 3_200.0,
            unit: "kg".to_string(),
            change_pct: -1.8,
        },
        ProductionSummary {
            module: FarmModule::Avicultura,
            product: "Huevos".to_string(),
            quantity: 15_600.0,
            unit: "u".to_string(),
            change_pct: 11.0,
        },
        ProductionSummary {
            module: FarmModule::Piscicultura,
            product: "Tilapia".to_string(),
            quantity: 640.0,
            unit: "kg".to_string(),
            change_pct: 3.2,
        },
    ]
}

pub fn inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("inv-001", "Alimento balanceado", "Alimento", 2_500.0, "kg", 800.0),
        InventoryItem::new("inv-002", "Fertilizante NPK", "Fertilizante", 350.0, "kg", 400.0),
        InventoryItem::new("inv-003", "Vacuna aftosa", "Medicamento", 12.0, "dosis", 50.0),
    ]
}

pub fn tasks() -> Vec<Task> {
    vec![
        Task::new("t-101", "Vacunación del hato", "María López", FarmModule::Ganaderia, date(2024, 6, 15))
            .with_priority(Priority::Alta)
            .with_status(TaskStatus::EnProgreso),
        Task::new("t-102", "Riego parcela norte", "Juan Pérez", FarmModule::Agricultura, date(2024, 6, 14))
            .with_priority(Priority::Media),
        Task::new("t-103", "Limpieza de galpones", "Ana Torres", FarmModule::Avicultura, date(2024, 6, 13))
            .with_priority(Priority::Baja)
            .with_status(TaskStatus::Completada),
        Task::new("t-104", "Control de oxígeno en estanques", "Luis Gómez", FarmModule::Piscicultura, date(2024, 6, 16))
            .with_priority(Priority::Alta),
    ]
}

pub fn workers() -> Vec<WorkerSummary> {
    vec![
        WorkerSummary {
            id: WorkerId::new("w-01"),
            name: "María López".to_string(),
            role: "Veterinaria".to_string(),
            module: FarmModule::Ganaderia,
            tasks_completed: 18,
            tasks_pending: 2,
        },
        WorkerSummary {
            id: WorkerId::new("w-02"),
            name: "Juan Pérez".to_string(),
            role: "Agrónomo".to_string(),
            module: FarmModule::Agricultura,
            tasks_completed: 12,
            tasks_pending: 4,
        },
        WorkerSummary {
            id: WorkerId::new("w-03"),
            name: "Ana Torres".to_string(),
            role: "Operaria".to_string(),
            module: FarmModule::Avicultura,
            tasks_completed: 21,
            tasks_pending: 1,
        },
    ]
}

pub fn activities() -> Vec<Activity> {
    vec![
        Activity {
            id: ActivityId::new("a-1"),
            kind: ActivityKind::Produccion,
            description: "Registro de ordeño matutino: 420 L".to_string(),
            user: "María López".to_string(),
            timestamp: at_offset(30),
        },
        Activity {
            id: ActivityId::new("a-2"),
            kind: ActivityKind::Inventario,
            description: "Ingreso de 500 kg de alimento balanceado".to_string(),
            user: "Juan Pérez".to_string(),
            timestamp: at_offset(95),
        },
        Activity {
            id: ActivityId::new("a-3"),
            kind: ActivityKind::Venta,
            description: "Venta de 120 cubetas de huevo".to_string(),
            user: "Ana Torres".to_string(),
            timestamp: at_offset(180),
        },
        Activity {
            id: ActivityId::new("a-4"),
            kind: ActivityKind::Salud,
            description: "Tratamiento preventivo en lote 3".to_string(),
            user: "María López".to_string(),
            timestamp: at_offset(300),
        },
    ]
}

pub fn weather() -> WeatherData {
    let forecast = [
        ("Lun", 16.0, 27.0, WeatherCondition::Soleado),
        ("Mar", 17.0, 26.0, WeatherCondition::ParcialmenteNublado),
        ("Mié", 15.0, 22.0, WeatherCondition::Lluvia),
        ("Jue", 14.0, 21.0, WeatherCondition::Tormenta),
        ("Vie", 16.0, 25.0, WeatherCondition::Nublado),
    ]
    .into_iter()
    .map(|(day, min_c, max_c, condition)| DailyForecast {
        day: day.to_string(),
        min_c,
        max_c,
        condition,
    })
    .collect();

    WeatherData {
        location: "Finca La Esperanza".to_string(),
        temperature_c: 24.0,
        humidity_pct: 65.0,
        wind_kmh: 12.0,
        precipitation_mm: 2.5,
        condition: WeatherCondition::ParcialmenteNublado,
        forecast,
    }
}

pub fn monthly_income() -> Vec<MonthlyIncome> {
    [
        ("Ene", 38_500.0, 24_100.0),
        ("Feb", 36_200.0, 23_800.0),
        ("Mar", 41_800.0, 25_300.0),
        ("Abr", 43_100.0, 26_900.0),
        ("May", 43_480.0, 27_200.0),
        ("Jun", 48_920.0, 28_150.0),
    ]
    .into_iter()
    .map(|(month, income, expenses)| MonthlyIncome {
        month: month.to_string(),
        income,
        expenses,
    })
    .collect()
}

pub fn module_comparison() -> Vec<ModuleComparison> {
    [
        (FarmModule::Ganaderia, 21_400.0, 12_300.0, 42.0),
        (FarmModule::Agricultura, 11_900.0, 7_800.0, 24.0),
        (FarmModule::Avicultura, 12_600.0, 6_100.0, 27.0),
        (FarmModule::Piscicultura, 3_020.0, 1_950.0, 7.0),
    ]
    .into_iter()
    .map(|(module, income, expenses, production_share_pct)| ModuleComparison {
        module,
        income,
        expenses,
        production_share_pct,
    })
    .collect()
}

pub fn generated_reports() -> Vec<GeneratedReport> {
    vec![
        GeneratedReport {
            id: ReportId::new("rep-001"),
            title: ReportKind::Produccion.title().to_string(),
            kind: ReportKind::Produccion,
            format: ReportFormat::Pdf,
            generated_at: at_offset(60 * 24),
            size_kb: 245,
        },
        GeneratedReport {
            id: ReportId::new("rep-002"),
            title: ReportKind::Financiero.title().to_string(),
            kind: ReportKind::Financiero,
            format: ReportFormat::Excel,
            generated_at: at_offset(60 * 24 * 3),
            size_kb: 512,
        },
    ]
}

pub fn reportes_tasks() -> Vec<ReportesTask> {
    vec![
        ReportesTask {
            id: TaskId::new("rt-1"),
            title: "Cierre diario de producción".to_string(),
            kind: ReportKind::Produccion,
            schedule: ReportSchedule::Diario,
            next_run: date(2024, 6, 15),
            enabled: true,
        },
        ReportesTask {
            id: TaskId::new("rt-2"),
            title: "Balance financiero mensual".to_string(),
            kind: ReportKind::Financiero,
            schedule: ReportSchedule::Mensual,
            next_run: date(2024, 7, 1),
            enabled: true,
        },
        ReportesTask {
            id: TaskId::new("rt-3"),
            title: "Conteo semanal de inventario".to_string(),
            kind: ReportKind::Inventario,
            schedule: ReportSchedule::Semanal,
            next_run: date(2024, 6, 17),
            enabled: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrodash_core::StockStatus;

    #[test]
    fn test_four_metrics() {
        assert_eq!(metrics().len(), 4);
    }

    #[test]
    fn test_inventory_statuses_in_order() {
        let statuses: Vec<_> = inventory().into_iter().map(|item| item.status).collect();
        assert_eq!(
            statuses,
            vec![StockStatus::EnStock, StockStatus::Bajo, StockStatus::Critico]
        );
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(activities(), activities());
        assert_eq!(weather(), weather());
        assert_eq!(generated_reports(), generated_reports());
    }

    #[test]
    fn test_seed_timestamps_are_not_epoch_zero() {
        assert!(activities().iter().all(|a| a.timestamp.timestamp() > 0));
    }
}
