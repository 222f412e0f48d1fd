use crate::metrics::round2;
use crate::models::{CampaignRecord, Message};
use std::time::Duration;

pub fn render_index(records: &[CampaignRecord], message: Option<&Message>, message_timeout: Duration) -> String {
    let empty_class = if records.is_empty() { "" } else { "hidden" };
    let message = render_message(message);
    let cards = render_cards(records);
    let count = records.len().to_string();
    let timeout_ms = message_timeout.as_millis().to_string();

    fill_template(INDEX_HTML, |key| match key {
        "MESSAGE" => Some(message.as_str()),
        "CARDS" => Some(cards.as_str()),
        "EMPTY_CLASS" => Some(empty_class),
        "COUNT" => Some(count.as_str()),
        "MESSAGE_TIMEOUT_MS" => Some(timeout_ms.as_str()),
        _ => None,
    })
}

/// Replace `{{KEY}}` placeholders in one pass over the template. Substituted
/// text is never scanned again, so user text that looks like a placeholder
/// stays as written. Unknown keys are left in place.
fn fill_template<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => match value(&after[..end]) {
                Some(text) => {
                    out.push_str(text);
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str("{{");
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_message(message: Option<&Message>) -> String {
    match message {
        Some(message) => format!(
            r#"<div class="message {}" role="status">{}</div>"#,
            message.severity.as_str(),
            escape_html(&message.text)
        ),
        None => String::new(),
    }
}

pub fn render_cards(records: &[CampaignRecord]) -> String {
    records.iter().map(render_card).collect()
}

fn render_card(record: &CampaignRecord) -> String {
    format!(
        r#"<article class="campaign-card">
        <form method="post" action="/campaigns/{id}/delete">
          <button class="delete-btn" type="submit" title="Delete campaign">&times;</button>
        </form>
        <h3>{name}</h3>
        <div class="metrics">
          <div class="metric"><span class="metric-value">{ctr}%</span><span class="metric-label">CTR</span></div>
          <div class="metric"><span class="metric-value">&#8377;{cpc}</span><span class="metric-label">CPC</span></div>
        </div>
        <dl class="details">
          <div><dt>Impressions</dt><dd>{impressions}</dd></div>
          <div><dt>Clicks</dt><dd>{clicks}</dd></div>
          <div><dt>Budget</dt><dd>&#8377;{budget}</dd></div>
        </dl>
      </article>
"#,
        id = record.id,
        name = escape_html(&record.name),
        ctr = format_amount(record.ctr),
        cpc = format_amount(record.cpc),
        impressions = format_count(record.impressions),
        clicks = format_count(record.clicks),
        budget = format_amount(record.budget),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Integer with thousands separators, e.g. `12,345`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_thousands(&digits);
    if value < 0 { format!("-{grouped}") } else { grouped }
}

/// Amount with thousands separators and at most two decimals, trailing
/// zeros dropped: `1,234.5`, `10`.
pub fn format_amount(value: f64) -> String {
    let rounded = round2(value);
    let text = format!("{}", rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };
    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Ad Campaign Insights</title>
  <style>
    :root {
      --grad-a: #667eea;
      --grad-b: #764ba2;
      --ink: #2d2a32;
      --muted: #6b6675;
      --card: rgba(255, 255, 255, 0.94);
      --ok: #2f855a;
      --bad: #c53030;
      --shadow: 0 18px 48px rgba(49, 38, 89, 0.22);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--grad-a), var(--grad-b));
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header h1 {
      margin: 0;
      color: white;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
    }

    header p {
      margin: 6px 0 0;
      color: rgba(255, 255, 255, 0.85);
    }

    .panel {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .panel h2 {
      margin: 0 0 16px;
      font-size: 1.2rem;
    }

    #campaignForm {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input {
      border: 1px solid #d8d4e4;
      border-radius: 10px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    button.submit {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      color: white;
      background: linear-gradient(135deg, var(--grad-a), var(--grad-b));
      cursor: pointer;
    }

    .message {
      border-radius: 12px;
      padding: 12px 16px;
      font-weight: 600;
      transition: opacity 0.5s ease;
    }

    .message.success {
      background: #e6f6ec;
      color: var(--ok);
    }

    .message.error {
      background: #fdeaea;
      color: var(--bad);
    }

    #campaignCards {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
      gap: 16px;
    }

    .campaign-card {
      position: relative;
      background: white;
      border-radius: 16px;
      border: 1px solid rgba(102, 126, 234, 0.18);
      padding: 18px;
      animation: fade-in 400ms ease;
    }

    .campaign-card h3 {
      margin: 0 28px 12px 0;
      word-break: break-word;
    }

    .delete-btn {
      position: absolute;
      top: 10px;
      right: 12px;
      border: none;
      background: transparent;
      font-size: 1.4rem;
      color: var(--muted);
      cursor: pointer;
    }

    .delete-btn:hover {
      color: var(--bad);
    }

    .metrics {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 10px;
    }

    .metric {
      display: grid;
      gap: 4px;
      text-align: center;
      background: #f5f3fb;
      border-radius: 12px;
      padding: 10px;
    }

    .metric-value {
      font-size: 1.4rem;
      font-weight: 700;
      color: var(--grad-b);
    }

    .metric-label {
      font-size: 0.75rem;
      letter-spacing: 0.1em;
      text-transform: uppercase;
      color: var(--muted);
    }

    .details {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 8px;
      margin: 14px 0 0;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .details dt {
      font-weight: 600;
    }

    .details dd {
      margin: 2px 0 0;
    }

    #emptyState {
      text-align: center;
      color: var(--muted);
      padding: 24px;
    }

    .hidden {
      display: none;
    }

    .chart-wrap {
      width: 100%;
      overflow-x: auto;
    }

    #performanceChart {
      width: 100%;
      min-height: 320px;
    }

    #performanceChart text {
      font-size: 11px;
      fill: var(--muted);
    }

    .bar-ctr {
      fill: rgba(102, 126, 234, 0.8);
      stroke: rgba(102, 126, 234, 1);
    }

    .bar-cpc {
      fill: rgba(118, 75, 162, 0.8);
      stroke: rgba(118, 75, 162, 1);
    }

    .chart-grid {
      stroke: rgba(0, 0, 0, 0.08);
    }

    .chart-axis {
      stroke: rgba(0, 0, 0, 0.35);
    }

    @keyframes fade-in {
      from {
        opacity: 0;
        transform: translateY(6px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Ad Campaign Insights</h1>
      <p>Track click-through rate and cost per click across your campaigns.</p>
    </header>

    <div id="messageContainer">{{MESSAGE}}</div>

    <section class="panel">
      <h2>Add campaign</h2>
      <form id="campaignForm" method="post" action="/campaigns">
        <label>Campaign name
          <input name="campaignName" type="text" required />
        </label>
        <label>Impressions
          <input name="impressions" type="number" min="1" step="1" required />
        </label>
        <label>Clicks
          <input name="clicks" type="number" min="0" step="1" required />
        </label>
        <label>Budget (&#8377;)
          <input name="budget" type="number" min="0" step="0.01" required />
        </label>
        <button class="submit" type="submit">Add campaign</button>
      </form>
    </section>

    <section class="panel">
      <h2>Campaigns ({{COUNT}})</h2>
      <div id="emptyState" class="{{EMPTY_CLASS}}">No campaigns yet. Add one above to see its metrics.</div>
      <div id="campaignCards">
      {{CARDS}}
      </div>
    </section>

    <section class="panel">
      <h2>Campaign Performance Metrics</h2>
      <div class="chart-wrap">
        <svg id="performanceChart" viewBox="0 0 800 320" role="img" aria-label="CTR and CPC per campaign"></svg>
      </div>
    </section>
  </main>

  <script>
    const messageTimeoutMs = {{MESSAGE_TIMEOUT_MS}};
    const chartEl = document.getElementById('performanceChart');
    const svgNs = 'http://www.w3.org/2000/svg';

    const dismissMessage = () => {
      const message = document.querySelector('#messageContainer .message');
      if (!message) {
        return;
      }
      setTimeout(() => {
        message.style.opacity = '0';
        setTimeout(() => message.remove(), 500);
      }, messageTimeoutMs);
    };

    const svg = (tag, attrs, text) => {
      const node = document.createElementNS(svgNs, tag);
      Object.entries(attrs).forEach(([key, value]) => node.setAttribute(key, value));
      if (text !== undefined) {
        node.textContent = text;
      }
      chartEl.appendChild(node);
      return node;
    };

    const niceMax = (values) => {
      const max = Math.max(0, ...values);
      if (max === 0) {
        return 1;
      }
      const magnitude = Math.pow(10, Math.floor(Math.log10(max)));
      return Math.ceil(max / magnitude) * magnitude;
    };

    const renderChart = ({ labels, ctr, cpc }) => {
      chartEl.innerHTML = '';
      const width = Math.max(800, labels.length * 90);
      const height = 320;
      const padLeft = 56;
      const padRight = 56;
      const padTop = 30;
      const padBottom = 56;
      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);

      if (labels.length === 0) {
        svg('text', { x: width / 2, y: height / 2, 'text-anchor': 'middle' }, 'No campaigns yet');
        return;
      }

      const plotW = width - padLeft - padRight;
      const plotH = height - padTop - padBottom;
      const ctrMax = niceMax(ctr);
      const cpcMax = niceMax(cpc);
      const yOf = (value, max) => padTop + plotH - (value / max) * plotH;

      for (let step = 0; step <= 4; step += 1) {
        const y = padTop + (plotH / 4) * step;
        svg('line', { class: 'chart-grid', x1: padLeft, y1: y, x2: width - padRight, y2: y });
        svg('text', { x: padLeft - 8, y: y + 4, 'text-anchor': 'end' }, `${(ctrMax * (4 - step) / 4).toFixed(2)}%`);
        svg('text', { x: width - padRight + 8, y: y + 4 }, `₹${(cpcMax * (4 - step) / 4).toFixed(2)}`);
      }
      svg('line', { class: 'chart-axis', x1: padLeft, y1: padTop, x2: padLeft, y2: padTop + plotH });
      svg('line', { class: 'chart-axis', x1: width - padRight, y1: padTop, x2: width - padRight, y2: padTop + plotH });
      svg('text', { x: padLeft, y: padTop - 12, 'text-anchor': 'middle' }, 'CTR (%)');
      svg('text', { x: width - padRight, y: padTop - 12, 'text-anchor': 'middle' }, 'CPC (₹)');

      const slot = plotW / labels.length;
      const barW = Math.min(32, slot / 3);
      labels.forEach((label, index) => {
        const center = padLeft + slot * index + slot / 2;
        const ctrY = yOf(ctr[index], ctrMax);
        const cpcY = yOf(cpc[index], cpcMax);
        svg('rect', { class: 'bar-ctr', x: center - barW, y: ctrY, width: barW, height: padTop + plotH - ctrY })
          .appendChild(document.createElementNS(svgNs, 'title')).textContent = `${label}: CTR ${ctr[index]}%`;
        svg('rect', { class: 'bar-cpc', x: center, y: cpcY, width: barW, height: padTop + plotH - cpcY })
          .appendChild(document.createElementNS(svgNs, 'title')).textContent = `${label}: CPC ₹${cpc[index]}`;
        svg('text', { x: center, y: padTop + plotH + 18, 'text-anchor': 'middle' }, label);
      });

      svg('rect', { class: 'bar-ctr', x: padLeft, y: height - 22, width: 12, height: 12 });
      svg('text', { x: padLeft + 18, y: height - 12 }, 'CTR (%)');
      svg('rect', { class: 'bar-cpc', x: padLeft + 90, y: height - 22, width: 12, height: 12 });
      svg('text', { x: padLeft + 108, y: height - 12 }, 'CPC (₹)');
    };

    const loadChart = async () => {
      try {
        const response = await fetch('/api/chart');
        if (!response.ok) {
          throw new Error(`HTTP ${response.status}`);
        }
        renderChart(await response.json());
      } catch (err) {
        chartEl.innerHTML = '';
        svg('text', { x: 400, y: 160, 'text-anchor': 'middle' }, 'Chart unavailable');
      }
    };

    dismissMessage();
    loadChart();
  </script>
</body>
</html>
"#;
