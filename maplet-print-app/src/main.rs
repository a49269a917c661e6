use anyhow::{anyhow, Context};
use maplet_print::prelude::*;

/// Resolution the simulated GPU reports for its largest render buffer
const SIMULATED_BUFFER_LIMIT: i64 = 8192;

/// Prepares a print export from a simulated live map and prints a summary.
///
/// Usage: `maplet-print-app [request.json]`. Without an argument an A4
/// portrait export at 300 dpi with both scale indicators is prepared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    maplet_print::init_logging();

    let request = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            ExportRequest::from_json_str(&json).map_err(|e| anyhow!(e))?
        }
        None => default_request()?,
    };

    // Live map centered on San Francisco, loading in the background
    let live = Arc::new(
        HeadlessMap::new(Viewport::new(
            LatLng::new(37.7749, -122.4194),
            12.0,
            Point::new(request.client_width, request.client_height),
        ))
        .with_context(Arc::new(StaticContext::new(SIMULATED_BUFFER_LIMIT))),
    );
    let loading = HeadlessMap::spawn_load_simulation(live.clone(), 12, Duration::from_millis(80));

    let config = PrintConfig::default();
    let report = wait_for_map_to_render_within(
        &*live,
        config.quiescence.settle_window(),
        Some(Duration::from_secs(30)),
    )
    .await
    .map_err(|e| anyhow!(e))?;
    log::info!("Live map ready after {:?}", report.elapsed);
    loading.await?;

    let factory = HeadlessFactory::new()
        .with_context(Arc::new(StaticContext::new(SIMULATED_BUFFER_LIMIT)))
        .ready_on_create(true);
    let export = PrintPipeline::new(&factory)
        .with_config(config)
        .prepare(&*live, request.clone(), Vec::new())
        .await
        .map_err(|e| anyhow!(e))?;

    let (width, height) = export.pixel_size().map_err(|e| anyhow!(e))?;
    let bar = export
        .surface
        .find_control::<ScaleBarControl>()
        .map(|bar| bar.measure(export.surface.viewport().resolution()));
    let summary = serde_json::json!({
        "format": request.format,
        "orientation": request.orientation,
        "dpi": export.dpi,
        "maxDpi": export.max_dpi,
        "pixelRatio": export.pixel_ratio,
        "pixels": [width, height],
        "scale": export.calibration.map(|c| serde_json::json!({
            "legend": c.legend(),
            "fraction": c.representative_fraction(),
        })),
        "scaleBar": bar.map(|reading| serde_json::json!({
            "label": reading.label(),
            "widthPx": reading.width_px,
        })),
        "controls": export
            .surface
            .controls()
            .into_iter()
            .map(|(kind, position)| format!("{kind}@{}", position.as_str()))
            .collect::<Vec<_>>(),
        "settledAfterMs": export.quiescence.elapsed.as_millis() as u64,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn default_request() -> anyhow::Result<ExportRequest> {
    let scale = ScaleSpec::new(true, true, 0.25, ScaleUnit::Metric)?;
    Ok(ExportRequest::new("a4", Orientation::Portrait, 1200.0, 800.0)
        .with_dpi(300.0)
        .with_scale(scale))
}
