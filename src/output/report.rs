use super::OutputRecord;
use crate::model::UserRecord;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

pub fn render_html(records: &[OutputRecord], users: &[UserRecord]) -> Vec<u8> {
    let rows = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
    let rows = json_for_script_tag(&rows);
    let details = serde_json::to_string(users).unwrap_or_else(|_| "[]".to_string());
    let details = json_for_script_tag(&details);

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Userbook</title>
  <script src="https://cdn.tailwindcss.com?plugins=forms"></script>
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&amp;display=swap" rel="stylesheet"/>
  <style type="text/tailwindcss">
    body {{
      font-family: 'Inter', sans-serif;
    }}
  </style>
</head>
<body class="bg-slate-50 text-slate-900 min-h-screen">
  <script type="application/json" id="rows-data">{rows}</script>
  <script type="application/json" id="users-data">{details}</script>
  <main class="max-w-[1200px] mx-auto w-full px-8 py-10">
    <h1 class="text-4xl font-bold mb-6">Users</h1>

    <div class="flex items-center gap-3 mb-2 text-sm font-medium text-slate-600">
      Filter results by either first or last name:
    </div>
    <div class="flex items-center gap-3 mb-8">
      <input id="search" class="flex-1 rounded-xl border border-slate-200 px-4 py-3 text-sm" type="text"/>
      <button id="apply" class="rounded-xl bg-blue-600 text-white text-sm font-bold px-5 py-3" type="button">Filter</button>
    </div>

    <div id="count" class="text-xs text-slate-500 mb-3"></div>
    <div id="table" class="bg-white rounded-2xl border border-slate-200 divide-y divide-slate-100"></div>

    <div id="detail" class="hidden fixed inset-0 bg-slate-900/50 flex items-center justify-center">
      <div class="bg-white rounded-2xl p-8 max-w-md w-full">
        <div id="detail-body"></div>
        <button id="detail-close" class="mt-6 rounded-xl bg-slate-100 text-sm font-bold px-5 py-2" type="button">Close</button>
      </div>
    </div>
  </main>

  <script>
    const rows = JSON.parse(document.getElementById('rows-data').textContent || '[]');
    const users = JSON.parse(document.getElementById('users-data').textContent || '[]');
    const search = document.getElementById('search');
    const table = document.getElementById('table');
    const count = document.getElementById('count');
    const detail = document.getElementById('detail');
    const detailBody = document.getElementById('detail-body');

    function esc(value) {{
      return String(value ?? '')
        .replaceAll('&', '&amp;')
        .replaceAll('<', '&lt;')
        .replaceAll('>', '&gt;')
        .replaceAll('"', '&quot;')
        .replaceAll("'", '&#39;');
    }}

    function formatDob(raw) {{
      const d = new Date(raw);
      if (Number.isNaN(d.getTime())) return raw || '';
      return d.toLocaleString('en-US', {{ month: 'short', timeZone: 'UTC' }}) + ' ' + d.getUTCDate() + ', ' + d.getUTCFullYear();
    }}

    function showDetail(index) {{
      const u = users[index];
      if (!u) return;
      const l = u.location || {{}};
      const s = l.street || {{}};
      detailBody.innerHTML = `
        <img class="rounded-xl mb-4" src="${{esc((u.picture || {{}}).large)}}" alt="User Profile"/>
        <p class="font-bold">Name:</p><p class="mb-3">${{esc(u.name.first)}} ${{esc(u.name.last)}}</p>
        <p class="font-bold">Email:</p><p class="mb-3">${{esc(u.email)}}</p>
        <p class="font-bold">Address:</p>
        <p class="mb-3">${{esc(s.number)}} ${{esc(s.name)}}<br/>${{esc(l.city)}}, ${{esc(l.state)}} ${{esc(l.postcode)}}<br/>${{esc(l.country)}}</p>
        <p class="font-bold">Phone:</p><p class="mb-3">Main: ${{esc(u.phone)}}<br/>Cell: ${{esc(u.cell)}}</p>
        <p class="font-bold">Date of Birth:</p><p>${{esc(formatDob((u.dob || {{}}).date))}}</p>`;
      detail.classList.remove('hidden');
    }}

    function render(term) {{
      const t = term.toLowerCase();
      const html = [];
      let shown = 0;
      rows.forEach((r, i) => {{
        const u = users[i];
        const first = (u ? u.name.first : '').toLowerCase();
        const last = (u ? u.name.last : '').toLowerCase();
        if (t && !first.includes(t) && !last.includes(t)) return;
        shown += 1;
        html.push(`<div class="flex px-5 py-3 cursor-pointer hover:bg-slate-50" data-index="${{i}}">
          <span style="width: 40%">${{esc(r.name)}}</span>
          <span style="width: 40%">${{esc(r.email)}}</span>
          <span style="width: 20%">${{esc(r.location)}}</span>
        </div>`);
      }});
      table.innerHTML = html.join('');
      count.textContent = `${{shown}} of ${{rows.length}} users`;
      search.placeholder = t ? 'Show All Users' : '';
    }}

    table.addEventListener('click', (e) => {{
      const row = e.target.closest('[data-index]');
      if (row) showDetail(Number(row.dataset.index));
    }});
    document.getElementById('apply').addEventListener('click', () => render(search.value));
    document.getElementById('detail-close').addEventListener('click', () => detail.classList.add('hidden'));
    render('');
  </script>
</body>
</html>
"####
    );

    html.into_bytes()
}
