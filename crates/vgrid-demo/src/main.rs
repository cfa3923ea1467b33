#![forbid(unsafe_code)]

//! Scripted demo: a 50 000-row synthetic dataset scrolled through a
//! fixed-height viewport, with an expansion, a detail reveal, and the
//! debounced progressive reveal all driven by a manual clock.
//!
//! Run with: `RUST_LOG=debug cargo run -p vgrid-demo`

use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;

use vgrid_table::{Column, DetailStatus, RenderPlan, TableConfig, TableView, VecSource};

const N: usize = 50_000;
const ROW_HEIGHT: u32 = 33;
const DETAIL_HEIGHT: u32 = 120;

#[derive(Debug, Clone)]
struct Order {
    id: u64,
    customer: String,
    sku: String,
    qty: u32,
    cents: u64,
}

fn dataset() -> VecSource<Order> {
    let rows = (0..N as u64)
        .map(|i| Order {
            id: 100_000 + i,
            customer: format!("customer-{:05}", (i * 7919) % 9973),
            sku: format!("SKU-{:04}", (i * 31) % 4096),
            qty: (i % 144) as u32 + 1,
            cents: (i * 137) % 1_000_000,
        })
        .collect();
    VecSource::new(
        rows,
        |r| r.id,
        vec![
            Column {
                id: "id",
                title: "Order",
                width: 100,
                sortable: true,
                accessor: |r: &Order| r.id.to_string(),
            },
            Column {
                id: "customer",
                title: "Customer",
                width: 220,
                sortable: true,
                accessor: |r: &Order| r.customer.clone(),
            },
            Column {
                id: "sku",
                title: "SKU",
                width: 140,
                sortable: true,
                accessor: |r: &Order| r.sku.clone(),
            },
            Column {
                id: "qty",
                title: "Qty",
                width: 70,
                sortable: true,
                accessor: |r: &Order| format!("{:03}", r.qty),
            },
            Column {
                id: "total",
                title: "Total",
                width: 110,
                sortable: true,
                accessor: |r: &Order| format!("${}.{:02}", r.cents / 100, r.cents % 100),
            },
        ],
    )
}

/// Report committed heights for everything the plan flagged.
fn commit_layout(view: &mut TableView<VecSource<Order>>, plan: &RenderPlan) {
    for slot in &plan.rows {
        if slot.needs_measure {
            let height = match (slot.expanded, slot.detail) {
                // Revealed enrichment adds a few content lines.
                (true, Some(DetailStatus::Ready)) => ROW_HEIGHT + DETAIL_HEIGHT + 60,
                (true, _) => ROW_HEIGHT + DETAIL_HEIGHT,
                _ => ROW_HEIGHT,
            };
            view.record_row_height(slot.index, height);
        }
    }
}

fn log_plan(step: &str, plan: &RenderPlan, view: &TableView<VecSource<Order>>) {
    let skeletons = plan.rows.iter().filter(|s| !s.loaded).count();
    info!(
        step,
        rendered = plan.rows.len(),
        skeletons,
        retired = plan.retired.len(),
        total_height = plan.total_height,
        frontier = view.session().frontier(),
        revealed = view.session().revealed(),
        "plan"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut view = TableView::new(dataset(), TableConfig::default());
    let mut now = Instant::now();

    view.attach_viewport(800);
    let plan = view.render_plan_at(now);
    commit_layout(&mut view, &plan);
    log_plan("mount", &plan, &view);

    // Expand an early row, then scroll far past it; the expanded row stays
    // in every plan at its true offset.
    view.toggle_row(5);
    let plan = view.render_plan_at(now);
    commit_layout(&mut view, &plan);
    log_plan("expand row 5", &plan, &view);

    for scroll_rows in [200u64, 2_500, 12_000, 30_303] {
        now += Duration::from_millis(40);
        view.set_scroll_top(scroll_rows * u64::from(ROW_HEIGHT));
        let plan = view.render_plan_at(now);
        commit_layout(&mut view, &plan);
        log_plan("scroll", &plan, &view);
    }

    // Let the detail reveal and the debounced watermark advances play out.
    while let Some(wait) = view.next_deadline(now) {
        now += wait.max(Duration::from_millis(1));
        if view.tick_at(now) {
            let plan = view.render_plan_at(now);
            commit_layout(&mut view, &plan);
            log_plan("tick", &plan, &view);
        }
    }

    // Collapse and tear down.
    view.toggle_row(5);
    let plan = view.render_plan_at(now);
    log_plan("collapse", &plan, &view);
    view.dispose();
    info!("done");
}
