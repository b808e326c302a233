use crate::models::TodayResponse;

pub fn render_index(view: &TodayResponse) -> String {
    let warning = view
        .persistence_warning
        .as_deref()
        .map(escape_html)
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{DATE}}", &view.date.format("%A, %B %-d, %Y").to_string())
        .replace("{{SCORE}}", &view.score.to_string())
        .replace("{{MAX}}", &view.max_score.to_string())
        .replace("{{STREAK}}", &view.streak.to_string())
        .replace("{{WARNING}}", &warning)
        .replace("{{TASKS}}", &render_tasks(view))
}

fn render_tasks(view: &TodayResponse) -> String {
    view.tasks
        .iter()
        .map(|task| {
            let id = escape_html(&task.id);
            let title = escape_html(&task.title);
            let checked = if task.completed { " checked" } else { "" };
            let preview = if task.proof.is_empty() {
                String::new()
            } else {
                format!(
                    r#"<img class="preview" src="{}" alt="{} proof image" />"#,
                    escape_html(&task.proof),
                    title
                )
            };
            format!(
                r#"<article class="task" data-task-id="{id}">
        <form method="post" action="/tasks/{id}/toggle">
          <label class="task-row">
            <input class="task-check" type="checkbox"{checked} />
            <span class="task-title">{title}</span>
            <span class="task-points">{points} pts</span>
          </label>
          <noscript><button type="submit">Toggle</button></noscript>
        </form>
        <input class="task-file" type="file" accept="image/*" />
        {preview}
      </article>"#,
                points = task.points,
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Log</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --full: #2d7a4b;
      --partial: #d99a2b;
      --missed: #c63b2b;
      --card: rgba(255, 255, 255, 0.86);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 { margin: 0; font-family: Georgia, serif; }
    .subtitle { margin: 0; color: #5f5c57; }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value { font-size: 1.7rem; font-weight: 600; color: var(--accent-2); }

    .task {
      background: white;
      border-radius: 18px;
      padding: 16px;
      display: grid;
      gap: 10px;
    }

    .task-row { display: flex; gap: 12px; align-items: center; }
    .task-title { flex: 1; font-weight: 600; }
    .task-points { color: #8b857d; }
    .preview { max-width: 160px; border-radius: 12px; }

    .actions { display: flex; gap: 12px; flex-wrap: wrap; }

    button, .button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      color: white;
      background: var(--accent-2);
      text-decoration: none;
    }

    .button { background: var(--accent); }

    .history { list-style: none; margin: 0; padding: 0; display: grid; gap: 6px; }
    .history-item { display: flex; justify-content: space-between; padding: 8px 12px; border-radius: 10px; background: white; }
    .history-item.full { border-left: 6px solid var(--full); }
    .history-item.partial { border-left: 6px solid var(--partial); }
    .history-item.missed { border-left: 6px solid var(--missed); }

    .warning { color: var(--missed); min-height: 1.2em; margin: 0; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Daily Log</h1>
      <p class="subtitle" id="todayDate">{{DATE}}</p>
    </header>

    <p class="warning" id="warning">{{WARNING}}</p>

    <section class="panel">
      <div class="stat">
        <span class="label">Score</span>
        <span class="value"><span id="scoreValue">{{SCORE}}</span>/<span id="maxValue">{{MAX}}</span></span>
      </div>
      <div class="stat">
        <span class="label">Streak</span>
        <span class="value" id="streakValue">{{STREAK}}</span>
      </div>
    </section>

    <section id="dailyTasks">
      {{TASKS}}
    </section>

    <section class="actions">
      <form id="clearForm" method="post" action="/clear">
        <button type="submit">Clear today</button>
      </form>
      <a class="button" href="/api/export">Export backup</a>
    </section>

    <section>
      <h2>History</h2>
      <ul class="history" id="historyList"></ul>
    </section>
  </main>

  <script>
    const scoreEl = document.getElementById('scoreValue');
    const maxEl = document.getElementById('maxValue');
    const streakEl = document.getElementById('streakValue');
    const warningEl = document.getElementById('warning');
    const historyEl = document.getElementById('historyList');

    const request = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body || {})
      });
      if (res.status === 409) {
        return null;
      }
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const updateToday = (data) => {
      if (!data) return;
      scoreEl.textContent = data.score;
      maxEl.textContent = data.max_score;
      streakEl.textContent = data.streak;
      warningEl.textContent = data.persistence_warning || '';
      data.tasks.forEach((task) => {
        const article = document.querySelector(`.task[data-task-id="${CSS.escape(task.id)}"]`);
        if (!article) return;
        article.querySelector('.task-check').checked = task.completed;
        let preview = article.querySelector('.preview');
        if (task.proof) {
          if (!preview) {
            preview = document.createElement('img');
            preview.className = 'preview';
            article.appendChild(preview);
          }
          preview.src = task.proof;
          preview.alt = `${task.title} proof image`;
        }
      });
    };

    const loadHistory = async () => {
      const res = await fetch('/api/history');
      if (!res.ok) throw new Error('Unable to load history');
      const data = await res.json();
      historyEl.innerHTML = '';
      data.days.forEach((day) => {
        const li = document.createElement('li');
        li.className = `history-item ${day.status}`;
        const date = document.createElement('span');
        date.textContent = day.date;
        const score = document.createElement('strong');
        score.textContent = `${day.score}/${data.max_score}`;
        li.append(date, score);
        historyEl.prepend(li);
      });
    };

    const showError = (err) => {
      warningEl.textContent = err.message;
    };

    const refresh = async (data) => {
      updateToday(data);
      await loadHistory();
    };

    document.querySelectorAll('.task').forEach((article) => {
      const id = article.dataset.taskId;
      const checkbox = article.querySelector('.task-check');
      const file = article.querySelector('.task-file');

      checkbox.addEventListener('change', () => {
        request(`/api/tasks/${encodeURIComponent(id)}/completion`, { completed: checkbox.checked })
          .then(refresh)
          .catch(showError);
      });

      let pending = null;

      file.addEventListener('change', async () => {
        const selected = file.files && file.files[0];
        if (!selected) return;
        if (pending) pending.abort();
        const reader = new FileReader();
        pending = reader;
        try {
          const { ticket } = await request(`/api/tasks/${encodeURIComponent(id)}/proof/begin`);
          reader.onload = () => {
            if (pending !== reader) return;
            pending = null;
            request(`/api/tasks/${encodeURIComponent(id)}/proof`, { proof: String(reader.result || ''), ticket })
              .then(refresh)
              .catch(showError);
          };
          if (pending === reader) reader.readAsDataURL(selected);
        } catch (err) {
          showError(err);
        }
      });
    });

    document.getElementById('clearForm').addEventListener('submit', (event) => {
      event.preventDefault();
      request('/api/clear').then((data) => {
        document.querySelectorAll('.preview').forEach((node) => node.remove());
        return refresh(data);
      }).catch(showError);
    });

    loadHistory().catch(showError);
  </script>
</body>
</html>
"#;
