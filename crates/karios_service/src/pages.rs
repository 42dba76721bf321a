//! Minimal HTML pages.

const INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Karios</title></head>
<body>
  <h1>Karios</h1>
  <p>Look up a crypto term or a coin.</p>
  <input id="termInput" placeholder="bitcoin, wallet, btc...">
  <button onclick="searchTerm()">Search</button>
  <pre id="result"></pre>
  <h2>Top coins</h2>
  <ul id="top-coins"></ul>
  <p><a href="/register">Register</a> | <a href="/login">Login</a></p>
  <script>
    async function loadTopCoins() {
      const list = document.getElementById("top-coins");
      const coins = await (await fetch("/top_coins")).json();
      if (!Array.isArray(coins)) {
        list.textContent = "Market data unavailable.";
        return;
      }
      for (const coin of coins) {
        const item = document.createElement("li");
        const change = coin.change_24h == null ? "n/a" : `${coin.change_24h.toFixed(2)}%`;
        item.textContent = `${coin.name} (${coin.symbol}) $${coin.price} ${change}`;
        list.appendChild(item);
      }
    }

    async function searchTerm() {
      const q = document.getElementById("termInput").value.trim().toLowerCase();
      if (!q) return;
      const out = document.getElementById("result");
      const term = await (await fetch(`/term/${encodeURIComponent(q)}`)).json();
      if (term.definition !== "No definition found.") {
        out.textContent = term.definition;
        return;
      }
      const coin = await (await fetch(`/crypto/${encodeURIComponent(q)}`)).json();
      out.textContent = coin.error
        ? "No term or coin found."
        : `${coin.name} (${coin.symbol}) $${coin.price} Rank: #${coin.rank}`;
    }

    loadTopCoins();
  </script>
</body>
</html>
"#;

const REGISTER: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Register</title></head>
<body>
  <h1>Register</h1>
  <form method="post" action="/register">
    <input name="username" placeholder="Username" required>
    <input name="password" type="password" placeholder="Password" required>
    <button type="submit">Register</button>
  </form>
  <p><a href="/login">Already have an account?</a></p>
</body>
</html>
"#;

const LOGIN: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Login</title></head>
<body>
  <h1>Login</h1>
  <form method="post" action="/login">
    <input name="username" placeholder="Username" required>
    <input name="password" type="password" placeholder="Password" required>
    <button type="submit">Login</button>
  </form>
  <p><a href="/register">Create an account</a></p>
</body>
</html>
"#;

pub fn index() -> &'static str {
    INDEX
}

pub fn register() -> &'static str {
    REGISTER
}

pub fn login() -> &'static str {
    LOGIN
}

pub fn dashboard(user: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Dashboard</title></head>
<body>
  <h1>Welcome, {}!</h1>
  <p><a href="/">Search the glossary</a> | <a href="/logout">Logout</a></p>
</body>
</html>
"#,
        escape(user)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
