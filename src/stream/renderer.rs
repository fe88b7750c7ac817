//! Stream chart drawing - grid, pressure area, win-probability curve,
//! event markers, and the value readout
//!
//! Draws onto an injected 2D canvas context. Layout and color decisions
//! live in pure helpers so they stay testable without a browser.

use web_sys::CanvasRenderingContext2d;

use super::series::{RollingSeriesBuffer, SeriesPoint};

/// Event markers pulse for this long after their timestamp (ms)
pub const MARKER_PULSE_MS: f64 = 2000.0;

/// Vertical padding inside the plot area (px)
const PLOT_PAD: f64 = 10.0;

const BACKGROUND: &str = "#0d1117";
const GRID_LINE: &str = "rgba(255, 255, 255, 0.06)";
const WP_CURVE: &str = "#4dabf7";
const PRESSURE_HIGH: &str = "rgba(255, 107, 53, 0.55)";
const PRESSURE_LOW: &str = "rgba(255, 107, 53, 0.04)";
const MARKER: &str = "#ffd43b";
const READOUT_BG: &str = "rgba(13, 17, 23, 0.85)";
const READOUT_TEXT: &str = "#e6edf3";

// ============================================================================
// PURE HELPERS
// ============================================================================

/// Four-tier situational pressure label
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressureTier {
    Low,
    Moderate,
    High,
    Extreme,
}

impl PressureTier {
    pub fn from_value(pressure: f32) -> Self {
        match pressure {
            p if p < 0.3 => PressureTier::Low,
            p if p < 0.5 => PressureTier::Moderate,
            p if p < 0.7 => PressureTier::High,
            _ => PressureTier::Extreme,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PressureTier::Low => "LOW",
            PressureTier::Moderate => "MODERATE",
            PressureTier::High => "HIGH",
            PressureTier::Extreme => "EXTREME",
        }
    }

    /// CSS color for this tier
    pub fn color(&self) -> &'static str {
        match self {
            PressureTier::Low => "#51cf66",
            PressureTier::Moderate => "#ffd43b",
            PressureTier::High => "#ff922b",
            PressureTier::Extreme => "#ff4757",
        }
    }
}

/// Linear opacity decay of a pulsing event marker.
///
/// 1 at age 0, exactly 0 at `MARKER_PULSE_MS` and beyond, monotonically
/// non-increasing in between.
pub fn marker_opacity(age_ms: f64) -> f64 {
    if age_ms <= 0.0 {
        return 1.0;
    }
    (1.0 - age_ms / MARKER_PULSE_MS).max(0.0)
}

/// Map a timestamp into plot x for the given time domain
fn x_for(t: f64, domain: (f64, f64), width: f64) -> f64 {
    let span = domain.1 - domain.0;
    if span <= 0.0 {
        return width;
    }
    (t - domain.0) / span * width
}

/// Map a 0-1 value onto the padded vertical axis (1 at the top)
fn y_for(value: f32, height: f64) -> f64 {
    PLOT_PAD + (1.0 - value as f64) * (height - 2.0 * PLOT_PAD)
}

// ============================================================================
// LAYERS
// ============================================================================

/// Render the whole chart for one frame
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    buffer: &RollingSeriesBuffer,
    now_ms: f64,
    width: f64,
    height: f64,
) {
    draw_background(ctx, width, height);

    // An empty buffer has no time domain; data layers are skipped
    if let Some(domain) = buffer.domain() {
        let positions: Vec<(f64, f64, f64)> = buffer
            .iter()
            .map(|p| {
                (
                    x_for(p.t, domain, width),
                    y_for(p.wp, height),
                    y_for(p.pressure, height),
                )
            })
            .collect();

        draw_pressure_area(ctx, &positions, height);
        draw_wp_curve(ctx, &positions);
        draw_event_markers(ctx, buffer, domain, now_ms, width, height);
    }

    if let Some(latest) = buffer.latest() {
        draw_readout(ctx, latest, width);
    }
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.set_stroke_style_str(GRID_LINE);
    ctx.set_line_width(1.0);

    for i in 1..6 {
        let x = width * i as f64 / 6.0;
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, height);
        ctx.stroke();
    }
    for i in 1..5 {
        let y = height * i as f64 / 5.0;
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
        ctx.stroke();
    }
}

/// Filled area whose height encodes pressure, shaded top-down from the
/// high-pressure to the low-pressure color
fn draw_pressure_area(
    ctx: &CanvasRenderingContext2d,
    positions: &[(f64, f64, f64)],
    height: f64,
) {
    if positions.len() < 2 {
        return;
    }

    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    let _ = gradient.add_color_stop(0.0, PRESSURE_HIGH);
    let _ = gradient.add_color_stop(1.0, PRESSURE_LOW);
    ctx.set_fill_style_canvas_gradient(&gradient);

    ctx.begin_path();
    ctx.move_to(positions[0].0, height);
    for (x, _, y_pressure) in positions.iter() {
        ctx.line_to(*x, *y_pressure);
    }
    ctx.line_to(positions[positions.len() - 1].0, height);
    ctx.close_path();
    ctx.fill();
}

/// Win-probability curve, smoothed with quadratic segments through
/// successive midpoints
fn draw_wp_curve(ctx: &CanvasRenderingContext2d, positions: &[(f64, f64, f64)]) {
    if positions.len() < 2 {
        return;
    }

    ctx.set_stroke_style_str(WP_CURVE);
    ctx.set_line_width(2.0);

    ctx.begin_path();
    ctx.move_to(positions[0].0, positions[0].1);
    for i in 1..positions.len() - 1 {
        let (cx, cy, _) = positions[i];
        let mid_x = (cx + positions[i + 1].0) / 2.0;
        let mid_y = (cy + positions[i + 1].1) / 2.0;
        ctx.quadratic_curve_to(cx, cy, mid_x, mid_y);
    }
    let last = positions[positions.len() - 1];
    ctx.line_to(last.0, last.1);
    ctx.stroke();
}

/// Event markers: a pulsing, fading ring for 2000ms after the event,
/// a static dot afterwards
fn draw_event_markers(
    ctx: &CanvasRenderingContext2d,
    buffer: &RollingSeriesBuffer,
    domain: (f64, f64),
    now_ms: f64,
    width: f64,
    height: f64,
) {
    for point in buffer.iter() {
        let event = match &point.event {
            Some(e) => e,
            None => continue,
        };

        let x = x_for(point.t, domain, width);
        let y = y_for(point.wp, height);
        let age = now_ms - point.t;
        let opacity = marker_opacity(age);

        ctx.set_fill_style_str(MARKER);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 3.0, 0.0, std::f64::consts::TAU);
        ctx.fill();

        if opacity > 0.0 {
            let ring_radius = 4.0 + (age / MARKER_PULSE_MS).clamp(0.0, 1.0) * 14.0;

            ctx.set_global_alpha(opacity);
            ctx.set_stroke_style_str(MARKER);
            ctx.set_line_width(2.0);
            ctx.begin_path();
            let _ = ctx.arc(x, y, ring_radius, 0.0, std::f64::consts::TAU);
            ctx.stroke();

            ctx.set_fill_style_str(READOUT_TEXT);
            ctx.set_font("11px sans-serif");
            let _ = ctx.fill_text(&event.label, x + ring_radius + 4.0, y + 4.0);
            ctx.set_global_alpha(1.0);
        }
    }
}

/// Current-value box: latest win probability plus the pressure tier
fn draw_readout(ctx: &CanvasRenderingContext2d, latest: &SeriesPoint, width: f64) {
    let box_w = 150.0;
    let box_x = width - box_w - 10.0;

    ctx.set_fill_style_str(READOUT_BG);
    ctx.fill_rect(box_x, 10.0, box_w, 56.0);

    ctx.set_fill_style_str(READOUT_TEXT);
    ctx.set_font("bold 18px sans-serif");
    let _ = ctx.fill_text(
        &format!("WIN {:.0}%", latest.wp * 100.0),
        box_x + 12.0,
        34.0,
    );

    let tier = PressureTier::from_value(latest.pressure);
    ctx.set_fill_style_str(tier.color());
    ctx.set_font("12px sans-serif");
    let _ = ctx.fill_text(&format!("PRESSURE {}", tier.label()), box_x + 12.0, 54.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_opacity_decay() {
        assert_eq!(marker_opacity(0.0), 1.0);
        assert!((marker_opacity(500.0) - 0.75).abs() < 1e-9);
        assert!((marker_opacity(1000.0) - 0.5).abs() < 1e-9);
        assert_eq!(marker_opacity(2000.0), 0.0);
        assert_eq!(marker_opacity(10_000.0), 0.0);
    }

    #[test]
    fn test_marker_opacity_monotone_non_increasing() {
        let mut prev = marker_opacity(0.0);
        for step in 1..=300 {
            let next = marker_opacity(step as f64 * 10.0);
            assert!(next <= prev);
            prev = next;
        }
    }

    #[test]
    fn test_pressure_tier_boundaries() {
        assert_eq!(PressureTier::from_value(0.0), PressureTier::Low);
        assert_eq!(PressureTier::from_value(0.29), PressureTier::Low);
        assert_eq!(PressureTier::from_value(0.3), PressureTier::Moderate);
        assert_eq!(PressureTier::from_value(0.5), PressureTier::High);
        assert_eq!(PressureTier::from_value(0.7), PressureTier::Extreme);
        assert_eq!(PressureTier::from_value(1.0), PressureTier::Extreme);
    }

    #[test]
    fn test_tier_labels_and_colors_distinct() {
        let tiers = [
            PressureTier::Low,
            PressureTier::Moderate,
            PressureTier::High,
            PressureTier::Extreme,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in tiers.iter().skip(i + 1) {
                assert_ne!(a.label(), b.label());
                assert_ne!(a.color(), b.color());
            }
        }
    }

    #[test]
    fn test_time_to_x_mapping() {
        let domain = (1000.0, 2000.0);
        assert_eq!(x_for(1000.0, domain, 600.0), 0.0);
        assert_eq!(x_for(1500.0, domain, 600.0), 300.0);
        assert_eq!(x_for(2000.0, domain, 600.0), 600.0);

        // Single-point domain pins to the right edge
        assert_eq!(x_for(1000.0, (1000.0, 1000.0), 600.0), 600.0);
    }

    #[test]
    fn test_value_to_y_mapping() {
        // Value 1 at the padded top, 0 at the padded bottom
        assert_eq!(y_for(1.0, 200.0), PLOT_PAD);
        assert_eq!(y_for(0.0, 200.0), 200.0 - PLOT_PAD);
        assert!(y_for(0.75, 200.0) < y_for(0.25, 200.0));
    }
}
