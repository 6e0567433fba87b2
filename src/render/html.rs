use crate::model::ReportData;

/// Render a self-contained HTML timeline (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_report(data: &ReportData) -> anyhow::Result<String> {
    // `</` inside a target name must not close the script element.
    let json = serde_json::to_string(data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Ninja Build Timeline</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  main { padding: 12px 16px; }

  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .muted { color: #777; font-size: 12px; }

  table { border-collapse: collapse; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  th { background: white; border-bottom: 1px solid #ddd; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }

  #chart { position: relative; margin-top: 16px; border: 1px solid #ddd; overflow-x: auto; }
  .lane { position: relative; height: 24px; border-bottom: 1px solid #f0f0f0; }
  .lane-label { position: sticky; left: 0; z-index: 2; display: inline-block; width: 72px;
                height: 24px; line-height: 24px; padding-left: 6px; font-size: 12px;
                color: #555; background: #fafafa; border-right: 1px solid #ddd; }
  .task { position: absolute; top: 3px; height: 18px; line-height: 18px; font-size: 11px;
          overflow: hidden; white-space: nowrap; text-overflow: ellipsis; padding: 0 3px;
          box-sizing: border-box; border-radius: 3px; background: #8fb8ee; border: 1px solid #5b8fd6;
          cursor: default; }
  .task:hover { background: #5b8fd6; color: white; }
  #zoom { margin-left: 8px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<main>
  <h3>Bottlenecks</h3>
  <table>
    <thead>
      <tr><th>#</th><th>target</th><th class="num">duration</th></tr>
    </thead>
    <tbody id="bottlenecks"></tbody>
  </table>

  <h3>Timeline <span class="muted">zoom</span>
    <input id="zoom" type="range" min="1" max="50" value="1">
  </h3>
  <div id="chart"></div>
</main>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

const LABEL_WIDTH = 72;
const BASE_WIDTH = 1200;

function fmtDuration(seconds) {
  let ms = Math.max(0, Math.round(seconds * 1000));
  const parts = [];
  const h = Math.floor(ms / 3600000); ms -= h * 3600000;
  const m = Math.floor(ms / 60000); ms -= m * 60000;
  const s = Math.floor(ms / 1000); ms -= s * 1000;
  if (h) parts.push(h + "h");
  if (m) parts.push(m + "m");
  if (s) parts.push(s + "s");
  if (ms) parts.push(ms + "ms");
  return parts.length ? parts.join(" ") : "0s";
}

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function renderSummary() {
  const t = DATA.summary;
  const el = document.getElementById("summary");
  el.innerHTML = `
    <span class="pill">targets: <b>${t.targets}</b></span>
    <span class="pill">wall time: <b>${fmtDuration(t.wall_time)}</b></span>
    <span class="pill">cpu time: <b>${fmtDuration(t.cpu_time)}</b></span>
    <span class="pill">average: <b>${fmtDuration(t.average_time)}</b></span>
    <span class="pill">cores: <b>${t.cores}</b></span>
    <span class="pill">efficiency: <b>${(t.efficiency * 100).toFixed(2)}%</b></span>
  `;
}

function renderBottlenecks() {
  const body = document.getElementById("bottlenecks");
  body.innerHTML = "";
  for (const b of DATA.bottlenecks) {
    const tr = document.createElement("tr");
    tr.innerHTML = `
      <td>${b.rank}</td>
      <td><code title="${escapeHtml(b.full_target)}">${escapeHtml(b.target)}</code></td>
      <td class="num">${fmtDuration(b.duration)}</td>
    `;
    body.appendChild(tr);
  }
}

function renderChart(zoom) {
  const chart = document.getElementById("chart");
  chart.innerHTML = "";

  const span = Math.max(DATA.max_ms - DATA.min_ms, 1);
  const width = BASE_WIDTH * zoom;
  const x = (ms) => LABEL_WIDTH + ((ms - DATA.min_ms) / span) * width;

  const rows = new Map();
  for (const lane of DATA.lanes) {
    const row = document.createElement("div");
    row.className = "lane";
    row.style.width = (LABEL_WIDTH + width + 8) + "px";

    const label = document.createElement("span");
    label.className = "lane-label";
    label.textContent = lane.label;
    row.appendChild(label);

    chart.appendChild(row);
    rows.set(lane.id, row);
  }

  for (const task of DATA.tasks) {
    const row = rows.get(task.group);
    if (!row) continue;

    const bar = document.createElement("div");
    bar.className = "task";
    bar.style.left = x(task.start_ms) + "px";
    bar.style.width = Math.max(x(task.end_ms) - x(task.start_ms), 2) + "px";
    bar.title = `${task.title} (${fmtDuration(task.duration)})`;
    bar.textContent = task.content;
    row.appendChild(bar);
  }
}

document.getElementById("zoom").addEventListener("input", (e) => {
  renderChart(Number(e.target.value) || 1);
});

renderSummary();
renderBottlenecks();
renderChart(1);
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
