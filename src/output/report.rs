use crate::engine::Stats;
use crate::model::Insight;
use crate::output::csv::CSV_HEADERS;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders the standalone dashboard. Filtering, stats and CSV export run in
/// the browser against the embedded records; the stat cards are pre-filled so
/// the page reads correctly before the script runs.
pub fn render_html(insights: &[Insight], last_updated: &str) -> Vec<u8> {
    let json = serde_json::to_string(insights).unwrap_or_else(|_| "[]".to_string());
    let json = json_for_script_tag(&json);
    let last_updated = escape_html(last_updated);
    let csv_headers = serde_json::to_string(&CSV_HEADERS).unwrap_or_else(|_| "[]".to_string());
    let stats = Stats::collect(insights);
    let total = stats.total;
    let live = stats.live;
    let review = stats.review;
    let dynamic = stats.dynamic;
    let with_cta = stats.with_cta;
    let retired = stats.retired;

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Smart Facts Dashboard - Marketing Team</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <style>
    .gradient-bg {{
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    }}
    .card-hover {{
      transition: all 0.3s ease;
    }}
    .card-hover:hover {{
      transform: translateY(-2px);
      box-shadow: 0 10px 25px rgba(0,0,0,0.1);
    }}
    .status-badge {{
      font-size: 0.75rem;
      font-weight: 600;
      padding: 0.25rem 0.75rem;
      border-radius: 9999px;
    }}
    .status-live {{ background-color: #dcfce7; color: #166534; }}
    .status-review {{ background-color: #fef3c7; color: #92400e; }}
    .status-draft {{ background-color: #e5e7eb; color: #374151; }}
    .status-retired {{ background-color: #f3f4f6; color: #6b7280; }}
    .status-archived {{ background-color: #fee2e2; color: #991b1b; }}
    .view-active {{ background-color: #2563eb; color: #ffffff; }}
  </style>
</head>
<body class="bg-gray-50 min-h-screen">
  <script type="application/json" id="insights-data">{json}</script>

  <header class="gradient-bg text-white shadow-lg">
    <div class="max-w-6xl mx-auto px-6 sm:px-8 lg:px-12 py-6">
      <div class="flex items-center justify-between">
        <div>
          <h1 class="text-3xl font-bold">Smart Facts Dashboard</h1>
          <p class="text-blue-100 mt-1">Marketing Team - Content Management System</p>
          <p class="text-blue-200 text-sm mt-1">Last updated: {last_updated}</p>
        </div>
        <div class="text-right">
          <div id="stat-total" class="text-2xl font-bold">{total}</div>
          <div class="text-blue-100">Total Insights</div>
        </div>
      </div>
    </div>
  </header>

  <main class="max-w-6xl mx-auto px-6 sm:px-8 lg:px-12 py-6">
    <div class="bg-white rounded-lg shadow-sm p-6 mb-6">
      <div class="grid grid-cols-1 md:grid-cols-5 gap-4">
        <div class="md:col-span-2">
          <label for="search" class="block text-sm font-medium text-gray-700 mb-2">Search Insights</label>
          <input id="search" type="text" placeholder="Search by ID, content, or keywords..."
            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"/>
        </div>
        <div>
          <label for="status-filter" class="block text-sm font-medium text-gray-700 mb-2">Status</label>
          <select id="status-filter" class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500">
            <option value="">All Statuses</option>
            <option value="live">Live</option>
            <option value="review">Under Review</option>
            <option value="draft">Draft</option>
            <option value="retired">Retired</option>
            <option value="archived">Archived</option>
          </select>
        </div>
        <div>
          <label for="type-filter" class="block text-sm font-medium text-gray-700 mb-2">Type</label>
          <select id="type-filter" class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500">
            <option value="">All Types</option>
            <option value="static">Static Content</option>
            <option value="dynamic">Dynamic Content</option>
          </select>
        </div>
        <div>
          <span class="block text-sm font-medium text-gray-700 mb-2">View</span>
          <div class="flex rounded-md shadow-sm">
            <button id="view-grid" type="button" class="px-3 py-2 text-sm font-medium border border-gray-300 rounded-l-md">Grid</button>
            <button id="view-list" type="button" class="px-3 py-2 text-sm font-medium border border-gray-300 rounded-r-md">List</button>
          </div>
        </div>
      </div>
      <div class="mt-4 flex items-center justify-between">
        <p id="results-count" class="text-sm text-gray-500">Showing {total} of {total}</p>
        <button id="export-csv" type="button"
          class="inline-flex items-center px-4 py-2 border border-transparent text-sm font-medium rounded-md shadow-sm text-white bg-green-600 hover:bg-green-700">
          Export CSV
        </button>
      </div>
    </div>

    <div class="grid grid-cols-1 md:grid-cols-5 gap-6 mb-6">
      <div class="bg-white rounded-lg shadow-sm p-6">
        <p class="text-sm font-medium text-gray-600">Live</p>
        <p id="stat-live" class="text-2xl font-semibold text-gray-900">{live}</p>
      </div>
      <div class="bg-white rounded-lg shadow-sm p-6">
        <p class="text-sm font-medium text-gray-600">Under Review</p>
        <p id="stat-review" class="text-2xl font-semibold text-gray-900">{review}</p>
      </div>
      <div class="bg-white rounded-lg shadow-sm p-6">
        <p class="text-sm font-medium text-gray-600">Dynamic</p>
        <p id="stat-dynamic" class="text-2xl font-semibold text-gray-900">{dynamic}</p>
      </div>
      <div class="bg-white rounded-lg shadow-sm p-6">
        <p class="text-sm font-medium text-gray-600">With CTA</p>
        <p id="stat-with-cta" class="text-2xl font-semibold text-gray-900">{with_cta}</p>
      </div>
      <div class="bg-white rounded-lg shadow-sm p-6">
        <p class="text-sm font-medium text-gray-600">Retired</p>
        <p id="stat-retired" class="text-2xl font-semibold text-gray-900">{retired}</p>
      </div>
    </div>

    <noscript>
      <div class="bg-amber-50 border border-amber-200 rounded-lg p-5 mb-6 text-amber-800 font-semibold">
        This dashboard requires JavaScript to list insights.
      </div>
    </noscript>

    <div id="grid-view" class="grid grid-cols-1 lg:grid-cols-2 xl:grid-cols-3 gap-6"></div>
    <div id="list-view" class="space-y-4 hidden"></div>

    <div id="empty-state" class="text-center py-12 hidden">
      <h3 class="mt-2 text-sm font-medium text-gray-900">No insights found</h3>
      <p class="mt-1 text-sm text-gray-500">Try adjusting your search or filter criteria.</p>
    </div>
  </main>

  <script>
    (function() {{
      function escapeHtml(value) {{
        return String(value)
          .replaceAll('&', '&amp;')
          .replaceAll('<', '&lt;')
          .replaceAll('>', '&gt;')
          .replaceAll('"', '&quot;')
          .replaceAll("'", '&#39;');
      }}

      function list(value) {{
        return Array.isArray(value) ? value : [];
      }}

      const raw = document.getElementById('insights-data').textContent || '[]';
      const insights = JSON.parse(raw);

      const state = {{
        searchQuery: '',
        statusFilter: '',
        typeFilter: '',
        viewMode: 'grid'
      }};

      function matchesSearch(insight) {{
        if (!state.searchQuery) return true;
        const q = state.searchQuery.toLowerCase();
        return String(insight.id || '').toLowerCase().includes(q) ||
          String(insight.content || '').toLowerCase().includes(q);
      }}

      function matchesStatus(insight) {{
        return !state.statusFilter || insight.status === state.statusFilter;
      }}

      function matchesType(insight) {{
        return !state.typeFilter ||
          (state.typeFilter === 'static' && !insight.isDynamic) ||
          (state.typeFilter === 'dynamic' && !!insight.isDynamic);
      }}

      function filteredInsights() {{
        return insights.filter(i => matchesSearch(i) && matchesStatus(i) && matchesType(i));
      }}

      function stats() {{
        return {{
          total: insights.length,
          live: insights.filter(i => i.status === 'live').length,
          review: insights.filter(i => i.status === 'review').length,
          dynamic: insights.filter(i => i.isDynamic).length,
          withCta: insights.filter(i => i.hasCta).length,
          retired: insights.filter(i => i.status === 'retired').length
        }};
      }}

      const CSV_HEADERS = {csv_headers};

      function csvField(value) {{
        if (typeof value === 'string' && (value.includes(',') || value.includes('"') || value.includes('\n'))) {{
          return `"${{value.replace(/"/g, '""')}}"`;
        }}
        return String(value);
      }}

      function csvRow(insight) {{
        const cta = insight.cta || null;
        return [
          String(insight.id),
          String(insight.status),
          Number(insight.priority || 0),
          insight.isDynamic ? 'Dynamic' : 'Static',
          String(insight.content || '').replace(/\n/g, ' ').replace(/\r/g, ''),
          list(insight.templateKeys).join('; '),
          cta ? String(cta.text || '') : '',
          cta ? String(cta.url || '') : '',
          list(insight.requiredContext).join('; '),
          insight.requiresPrimaryUser ? 'Yes' : 'No',
          insight.requiresProfileComplete ? 'Yes' : 'No',
          insight.hasCta ? 'Yes' : 'No'
        ];
      }}

      function exportToCsv() {{
        const rows = filteredInsights();
        if (rows.length === 0) return;
        const csvContent = [
          CSV_HEADERS.join(','),
          ...rows.map(r => csvRow(r).map(csvField).join(','))
        ].join('\n');

        const blob = new Blob([csvContent], {{ type: 'text/csv;charset=utf-8;' }});
        const link = document.createElement('a');
        const url = URL.createObjectURL(blob);
        link.setAttribute('href', url);
        link.setAttribute('download', `smart_facts_export_${{new Date().toISOString().split('T')[0]}}.csv`);
        link.style.visibility = 'hidden';
        document.body.appendChild(link);
        link.click();
        document.body.removeChild(link);
        URL.revokeObjectURL(url);
      }}

      function badges(insight) {{
        const out = [`<span class="status-badge status-${{escapeHtml(insight.status)}}">${{escapeHtml(insight.status)}}</span>`];
        if (insight.isDynamic) out.push('<span class="px-2 py-1 bg-blue-100 text-blue-800 text-xs rounded-full">Dynamic</span>');
        if (insight.hasCta) out.push('<span class="px-2 py-1 bg-purple-100 text-purple-800 text-xs rounded-full">CTA</span>');
        return out.join('');
      }}

      function templateKeys(insight) {{
        const keys = list(insight.templateKeys);
        if (keys.length === 0) return '';
        const chips = keys.map(k => `<span class="px-2 py-1 bg-gray-100 text-gray-700 text-xs rounded">${{escapeHtml(k)}}</span>`).join('');
        return `<div class="mt-3"><h4 class="text-sm font-medium text-gray-700 mb-2">Dynamic Variables:</h4><div class="flex flex-wrap gap-1">${{chips}}</div></div>`;
      }}

      function ctaBlock(insight) {{
        if (!insight.cta) return '';
        return `<div class="mt-3">
            <h4 class="text-sm font-medium text-gray-700 mb-2">Call to Action:</h4>
            <div class="bg-gray-50 p-3 rounded">
              <div class="text-sm font-medium text-gray-900">${{escapeHtml(insight.cta.text || '')}}</div>
              <div class="text-xs text-blue-600 mt-1 break-all">${{escapeHtml(insight.cta.url || '')}}</div>
            </div>
          </div>`;
      }}

      function requirements(insight) {{
        const out = [];
        if (insight.requiresPrimaryUser) out.push('<div>&#10003; Requires Primary User</div>');
        if (insight.requiresProfileComplete) out.push('<div>&#10003; Requires Profile Complete</div>');
        const ctx = list(insight.requiredContext);
        if (ctx.length > 0) out.push(`<div>Context: ${{escapeHtml(ctx.join(', '))}}</div>`);
        return out.join('');
      }}

      function renderGrid(items) {{
        return items.map(insight => `<div class="bg-white rounded-lg shadow-sm p-6 card-hover">
            <div class="flex items-start justify-between mb-4">
              <div>
                <h3 class="text-lg font-semibold text-gray-900">${{escapeHtml(insight.id)}}</h3>
                <div class="flex items-center space-x-2 mt-1">${{badges(insight)}}</div>
              </div>
              <div class="text-right">
                <div class="text-sm text-gray-500">Priority</div>
                <div class="text-lg font-semibold">${{Number(insight.priority || 0)}}</div>
              </div>
            </div>
            <h4 class="text-sm font-medium text-gray-700 mb-2">Content:</h4>
            <p class="text-gray-600 text-sm leading-relaxed">${{escapeHtml(insight.content || '')}}</p>
            ${{templateKeys(insight)}}
            ${{ctaBlock(insight)}}
            <div class="mt-4 text-xs text-gray-500 space-y-1">${{requirements(insight)}}</div>
          </div>`).join('');
      }}

      function renderList(items) {{
        return items.map(insight => `<div class="bg-white rounded-lg shadow-sm p-6 card-hover">
            <div class="flex items-start space-x-4">
              <div class="flex-shrink-0 w-32">
                <h3 class="text-lg font-semibold text-gray-900">${{escapeHtml(insight.id)}}</h3>
                <div class="flex flex-col space-y-2 mt-2">
                  ${{badges(insight)}}
                  <div class="text-xs text-gray-500">Priority: <span class="font-semibold">${{Number(insight.priority || 0)}}</span></div>
                </div>
              </div>
              <div class="flex-1 min-w-0">
                <h4 class="text-sm font-medium text-gray-700 mb-2">Content:</h4>
                <p class="text-gray-600 text-sm leading-relaxed">${{escapeHtml(insight.content || '')}}</p>
                ${{templateKeys(insight)}}
                ${{ctaBlock(insight)}}
              </div>
              <div class="flex-shrink-0 w-48">
                <h4 class="text-sm font-medium text-gray-700 mb-2">Requirements:</h4>
                <div class="text-xs text-gray-500 space-y-1">${{requirements(insight)}}</div>
              </div>
            </div>
          </div>`).join('');
      }}

      const searchEl = document.getElementById('search');
      const statusEl = document.getElementById('status-filter');
      const typeEl = document.getElementById('type-filter');
      const viewGrid = document.getElementById('view-grid');
      const viewList = document.getElementById('view-list');
      const gridView = document.getElementById('grid-view');
      const listView = document.getElementById('list-view');
      const emptyState = document.getElementById('empty-state');
      const resultsCount = document.getElementById('results-count');

      function renderStats() {{
        const s = stats();
        document.getElementById('stat-total').textContent = s.total;
        document.getElementById('stat-live').textContent = s.live;
        document.getElementById('stat-review').textContent = s.review;
        document.getElementById('stat-dynamic').textContent = s.dynamic;
        document.getElementById('stat-with-cta').textContent = s.withCta;
        document.getElementById('stat-retired').textContent = s.retired;
      }}

      function render() {{
        const items = filteredInsights();
        resultsCount.textContent = `Showing ${{items.length}} of ${{insights.length}}`;

        const grid = state.viewMode === 'grid';
        viewGrid.classList.toggle('view-active', grid);
        viewList.classList.toggle('view-active', !grid);
        gridView.classList.toggle('hidden', !grid || items.length === 0);
        listView.classList.toggle('hidden', grid || items.length === 0);
        emptyState.classList.toggle('hidden', items.length !== 0);

        if (grid) {{
          gridView.innerHTML = renderGrid(items);
          listView.innerHTML = '';
        }} else {{
          listView.innerHTML = renderList(items);
          gridView.innerHTML = '';
        }}
      }}

      searchEl.addEventListener('input', function() {{
        state.searchQuery = searchEl.value || '';
        render();
      }});
      statusEl.addEventListener('change', function() {{
        state.statusFilter = statusEl.value;
        render();
      }});
      typeEl.addEventListener('change', function() {{
        state.typeFilter = typeEl.value;
        render();
      }});
      viewGrid.addEventListener('click', function() {{ state.viewMode = 'grid'; render(); }});
      viewList.addEventListener('click', function() {{ state.viewMode = 'list'; render(); }});
      document.getElementById('export-csv').addEventListener('click', exportToCsv);

      renderStats();
      render();
    }})();
  </script>
</body>
</html>
"####,
    );

    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    fn render(insights: &[Insight]) -> String {
        String::from_utf8(render_html(insights, "March 07, 2024 at 09:15 AM")).unwrap()
    }

    #[test]
    fn embeds_records_as_json() {
        let insight = Insight::new("SMRT1", "Rates", Status::Live);
        let html = render(&[insight]);
        assert!(html.contains(r#"<script type="application/json" id="insights-data">[{"id":"SMRT1""#));
        assert!(html.contains("Last updated: March 07, 2024 at 09:15 AM"));
    }

    #[test]
    fn script_close_tags_are_neutralised() {
        let insight = Insight::new("X", "</script><b>", Status::Draft);
        let html = render(&[insight]);
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn stat_cards_are_prefilled() {
        let mut a = Insight::new("A", "", Status::Live);
        a.has_cta = true;
        let mut b = Insight::new("B", "", Status::Retired);
        b.is_dynamic = true;
        let html = render(&[a, b]);
        assert!(html.contains(r#"<div id="stat-total" class="text-2xl font-bold">2</div>"#));
        assert!(html.contains(r#"id="stat-retired" class="text-2xl font-semibold text-gray-900">1</p>"#));
        assert!(html.contains(r#"id="stat-review" class="text-2xl font-semibold text-gray-900">0</p>"#));
    }

    #[test]
    fn browser_export_shares_csv_columns() {
        let html = render(&[]);
        let headers = serde_json::to_string(&CSV_HEADERS).unwrap();
        assert!(html.contains(&format!("const CSV_HEADERS = {headers};")));
        assert!(html.contains(r#"["ID","Status","Priority","Type","Content","#));
        assert!(html.contains("`smart_facts_export_${new Date().toISOString().split('T')[0]}.csv`"));
    }

    #[test]
    fn empty_dataset_still_renders() {
        let html = render(&[]);
        assert!(html.contains(r#"id="insights-data">[]</script>"#));
        assert!(html.contains("No insights found"));
        assert!(html.contains("Showing 0 of 0"));
    }
}
