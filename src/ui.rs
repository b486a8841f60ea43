use crate::models::TodayResponse;

pub fn render_index(today: &TodayResponse) -> String {
    let percent = if today.daily_goal_ml > 0 {
        (u64::from(today.amount_ml) * 100 / u64::from(today.daily_goal_ml)).min(100)
    } else {
        0
    };
    INDEX_HTML
        .replace("{{DATE}}", &today.date)
        .replace("{{AMOUNT}}", &today.amount_ml.to_string())
        .replace("{{GOAL}}", &today.daily_goal_ml.to_string())
        .replace("{{PERCENT}}", &percent.to_string())
        .replace("{{STREAK}}", &today.streak.to_string())
        .replace("{{BEST}}", &today.best_streak.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>HydroTracker</title>
  <style>
    :root {
      --bg-1: #0a1628;
      --bg-2: #12355b;
      --ink: #eaf4ff;
      --accent: #35c2ff;
      --accent-2: #0b86c8;
      --card: rgba(18, 53, 91, 0.55);
      --shadow: 0 24px 60px rgba(3, 12, 24, 0.45);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 65%),
        linear-gradient(160deg, var(--bg-1), #071020 70%);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(680px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
    }

    .subtitle {
      margin: 0;
      color: #9fc3e3;
    }

    .glass {
      position: relative;
      height: 220px;
      border: 2px solid var(--accent-2);
      border-radius: 14px 14px 24px 24px;
      overflow: hidden;
    }

    .fill {
      position: absolute;
      bottom: 0;
      width: 100%;
      background: linear-gradient(180deg, var(--accent), var(--accent-2));
      transition: height 400ms ease;
    }

    .readout {
      position: absolute;
      inset: 0;
      display: grid;
      place-items: center;
      font-size: 1.6rem;
      font-weight: 600;
      text-shadow: 0 2px 8px rgba(3, 12, 24, 0.6);
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
    }

    button {
      border: 0;
      border-radius: 12px;
      padding: 12px 18px;
      font-size: 1rem;
      color: #04121f;
      background: var(--accent);
      cursor: pointer;
    }

    button.secondary {
      background: transparent;
      border: 1px solid var(--accent-2);
      color: var(--ink);
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(120px, 1fr));
      gap: 12px;
    }

    .stat {
      background: rgba(7, 16, 32, 0.5);
      border-radius: 14px;
      padding: 14px;
      text-align: center;
    }

    .stat b {
      display: block;
      font-size: 1.4rem;
    }

    #status {
      min-height: 1.2em;
      color: #9fc3e3;
    }

    #banners {
      display: grid;
      gap: 8px;
    }

    .banner {
      background: rgba(53, 194, 255, 0.15);
      border-left: 3px solid var(--accent);
      border-radius: 8px;
      padding: 10px 14px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>HydroTracker</h1>
      <p class="subtitle">{{DATE}} &middot; goal {{GOAL}}ml</p>
    </header>

    <div class="glass">
      <div class="fill" id="fill" style="height: {{PERCENT}}%"></div>
      <div class="readout"><span id="amount">{{AMOUNT}}</span>&nbsp;ml</div>
    </div>

    <div class="row">
      <button data-ml="250">+250ml</button>
      <button data-ml="500">+500ml</button>
      <button data-ml="750">+750ml</button>
      <button class="secondary" id="undo">Undo</button>
    </div>

    <div class="stats">
      <div class="stat"><b id="streak">{{STREAK}}</b>day streak</div>
      <div class="stat"><b id="best">{{BEST}}</b>best streak</div>
      <div class="stat"><b id="percent">{{PERCENT}}%</b>of goal</div>
    </div>

    <p id="status"></p>
    <div id="banners"></div>
  </main>

  <script>
    const status = document.getElementById('status');
    const setStatus = (msg) => { status.textContent = msg; };

    const updateUI = (today) => {
      document.getElementById('amount').textContent = today.amountMl;
      document.getElementById('streak').textContent = today.streak;
      document.getElementById('best').textContent = today.bestStreak;
      const pct = today.dailyGoalMl > 0
        ? Math.min(100, Math.round(today.amountMl / today.dailyGoalMl * 100))
        : 0;
      document.getElementById('percent').textContent = pct + '%';
      document.getElementById('fill').style.height = pct + '%';
    };

    const refresh = async () => {
      const res = await fetch('/api/today');
      if (!res.ok) throw new Error('Unable to load today data');
      updateUI(await res.json());
    };

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body ? JSON.stringify(body) : null
      });
      if (!res.ok) {
        const payload = await res.json().catch(() => ({}));
        throw new Error(payload.error || 'Request failed');
      }
      return res.json();
    };

    document.querySelectorAll('button[data-ml]').forEach((button) => {
      button.addEventListener('click', async () => {
        try {
          const out = await post('/api/drink', { amountMl: Number(button.dataset.ml) });
          if (out.crossedGoal) setStatus('Goal reached!');
          await refresh();
        } catch (err) {
          setStatus(err.message);
        }
      });
    });

    document.getElementById('undo').addEventListener('click', async () => {
      try {
        await post('/api/undo');
        setStatus('Entry removed');
        await refresh();
      } catch (err) {
        setStatus(err.message);
      }
    });

    const pollBanners = async () => {
      try {
        const res = await fetch('/api/notifications');
        if (!res.ok) return;
        const banners = await res.json();
        const host = document.getElementById('banners');
        banners.forEach((banner) => {
          const el = document.createElement('div');
          el.className = 'banner';
          el.textContent = banner.title + ': ' + banner.body;
          host.prepend(el);
          if (Notification && Notification.permission === 'granted') {
            new Notification(banner.title, { body: banner.body });
          }
        });
      } catch (_) {
        /* banner polling is best effort */
      }
    };

    setInterval(pollBanners, 30000);
    pollBanners();
  </script>
</body>
</html>
"#;
