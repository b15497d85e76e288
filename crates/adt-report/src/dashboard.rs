//! Dashboard page rendering.
//!
//! Produces a single self-contained HTML page: three chart panels bound to
//! the aggregation tables, plus a user selector that drives a drill-down
//! table via the `/api/user-events` endpoint. The aggregation payload is
//! embedded as escaped JSON and parsed client-side; ECharts is loaded from a
//! pinned CDN version with an SRI hash.

use crate::config::DashboardOptions;
use crate::error::Result;
use adt_common::{AggregationResult, SCHEMA_VERSION};
use chrono::Utc;
use tracing::info;

/// Render the dashboard page for a computed aggregation.
///
/// The output is minified in release builds.
pub fn render_dashboard(result: &AggregationResult, options: &DashboardOptions) -> Result<String> {
    let html = generate_html(result, options)?;

    let output = if cfg!(debug_assertions) {
        html
    } else {
        let cfg = minify_html::Cfg {
            minify_js: true,
            minify_css: true,
            ..Default::default()
        };
        String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
    };

    info!(
        bytes = output.len(),
        events = result.total,
        "dashboard page rendered"
    );

    Ok(output)
}

fn generate_html(result: &AggregationResult, options: &DashboardOptions) -> Result<String> {
    let payload = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "generated_at": Utc::now(),
        "summary": result,
    });
    let data_json = serde_json::to_string(&payload)?;

    let echarts_url = options.echarts.url(&options.cdn_base, "echarts");

    let user_options: String = result
        .by_user
        .iter()
        .map(|u| {
            format!(
                r#"<option value="{v}">{v}</option>"#,
                v = html_escape(&u.user)
            )
        })
        .collect();

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="adthreat {version}">
    <meta name="robots" content="noindex, nofollow">
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f9fafb;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
            --accent-color: #3b82f6;
        }}
        body {{
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: system-ui, sans-serif;
            margin: 0;
            padding: 1.5rem;
        }}
        h1 {{ text-align: center; margin-bottom: 0.25rem; }}
        .subtitle {{ text-align: center; color: var(--text-secondary); margin-bottom: 2rem; }}
        .panel {{
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 8px;
            padding: 1rem;
            margin-bottom: 1.5rem;
        }}
        .panel h2 {{ margin-top: 0; font-size: 1.1rem; }}
        .chart {{ width: 100%; height: 360px; }}
        select {{
            font-size: 1rem;
            padding: 0.3rem 0.6rem;
            margin-bottom: 0.75rem;
        }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{
            text-align: left;
            padding: 0.4rem 0.6rem;
            border-bottom: 1px solid var(--border-color);
            font-size: 0.9rem;
        }}
        th {{ color: var(--text-secondary); }}
        .stats {{ text-align: center; color: var(--text-secondary); margin-bottom: 1.5rem; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="subtitle">{subtitle}</div>
    <div class="stats">{total} critical events · {undated} without a parseable timestamp</div>

    <div class="panel">
        <h2>Number of Critical Events by Event ID</h2>
        <div id="chart-events" class="chart"></div>
    </div>

    <div class="panel">
        <h2>Number of Critical Events by User</h2>
        <div id="chart-users" class="chart"></div>
    </div>

    <div class="panel">
        <h2>Number of Critical Events Over Time</h2>
        <div id="chart-dates" class="chart"></div>
    </div>

    <div class="panel">
        <h2>Events for User</h2>
        <select id="user-select">{user_options}</select>
        <table>
            <thead>
                <tr><th>TimeCreated</th><th>EventDescription</th><th>Description</th></tr>
            </thead>
            <tbody id="user-events"></tbody>
        </table>
    </div>

    <script type="application/json" id="dashboard-data">{data_json}</script>
    <script src="{echarts_url}" integrity="{echarts_sri}" crossorigin="anonymous"></script>
    <script>
        const data = JSON.parse(document.getElementById('dashboard-data').textContent);
        const summary = data.summary;

        function barChart(el, labels, counts, color) {{
            const chart = echarts.init(document.getElementById(el));
            chart.setOption({{
                tooltip: {{}},
                xAxis: {{ type: 'category', data: labels, axisLabel: {{ rotate: 45 }} }},
                yAxis: {{ type: 'value' }},
                series: [{{ type: 'bar', data: counts, itemStyle: {{ color: color }} }}]
            }});
            window.addEventListener('resize', () => chart.resize());
        }}

        barChart('chart-events',
            summary.by_event.map(e => String(e.event_id)),
            summary.by_event.map(e => e.count),
            '#87ceeb');
        barChart('chart-users',
            summary.by_user.map(u => u.user),
            summary.by_user.map(u => u.count),
            '#ffa500');

        const dateChart = echarts.init(document.getElementById('chart-dates'));
        dateChart.setOption({{
            tooltip: {{}},
            xAxis: {{ type: 'category', data: summary.by_date.map(d => d.date) }},
            yAxis: {{ type: 'value' }},
            series: [{{
                type: 'line',
                data: summary.by_date.map(d => d.count),
                symbol: 'circle',
                symbolSize: 8,
                itemStyle: {{ color: '#4682b4' }}
            }}]
        }});
        window.addEventListener('resize', () => dateChart.resize());

        const select = document.getElementById('user-select');
        const tbody = document.getElementById('user-events');

        async function refreshUserEvents() {{
            const user = select.value;
            if (!user) return;
            const resp = await fetch('/api/user-events?user=' + encodeURIComponent(user));
            if (!resp.ok) return;
            const payload = await resp.json();
            tbody.replaceChildren();
            for (const row of payload.rows ?? []) {{
                const tr = document.createElement('tr');
                for (const value of [row.time_created ?? 'unknown', row.event_description, row.description]) {{
                    const td = document.createElement('td');
                    td.textContent = value;
                    tr.appendChild(td);
                }}
                tbody.appendChild(tr);
            }}
        }}

        select.addEventListener('change', refreshUserEvents);
        refreshUserEvents();
    </script>
</body>
</html>"##,
        title = html_escape(&options.title),
        subtitle = html_escape(&options.subtitle),
        version = env!("CARGO_PKG_VERSION"),
        total = result.total,
        undated = result.undated,
        user_options = user_options,
        data_json = json_script_escape(&data_json),
        echarts_url = echarts_url,
        echarts_sri = options.echarts.sri,
    ))
}

/// Escape a JSON document for embedding inside a `<script>` element.
///
/// Script elements are raw text, so entity escaping would corrupt the
/// payload for `JSON.parse`. Only `<` needs rewriting, which blocks
/// `</script>` breakout while staying a valid JSON string escape.
fn json_script_escape(json: &str) -> String {
    json.replace('<', "\\u003c")
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
