//! Embedded HTML pages.
//!
//! Each page is a single constant with inline CSS and, for the chat widget,
//! inline JavaScript.  Only the home page has a dynamic part: the
//! navigation line, which depends on whether the caller is logged in.

/// Placeholder in [`INDEX_HTML`] replaced by the navigation line.
const NAV_SLOT: &str = "<!--NAV-->";

/// Shared stylesheet for every page.
const STYLE: &str = r##"<style>
*,*::before,*::after{box-sizing:border-box}
body{font-family:Arial,sans-serif;margin:0;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#000;color:#fff}
.container{width:400px;background:#333;padding:20px;border-radius:5px;box-shadow:0 0 10px rgba(0,0,0,.2)}
h1{text-align:center}
a{color:#0099cc}
input,textarea,select,button{width:100%;padding:10px;margin:6px 0;border:1px solid #444;border-radius:5px;background:#555;color:#fff}
button{background:#0099cc;cursor:pointer}
button:hover{background:#0077aa}
#chat{height:300px;overflow-y:auto;border:1px solid #444;padding:10px;border-radius:5px;background:#222}
.user-query{text-align:right;color:#0099cc}
.bot-response{text-align:left}
</style>"##;

/// The chat widget.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Class 10 Chatbot</title>
<!--STYLE-->
</head>
<body>
<div class="container">
  <h1>Class 10 Chatbot</h1>
  <!--NAV-->
  <div id="chat"></div>
  <input type="text" id="query" placeholder="Ask your question">
  <select id="subject">
    <option value="math">Math</option>
    <option value="science">Science</option>
    <option value="social">Social Science</option>
  </select>
  <button id="send">Ask</button>
</div>
<script>
function line(cls, text) {
  const div = document.createElement("div");
  div.className = cls;
  div.textContent = text;
  document.getElementById("chat").appendChild(div);
}
document.getElementById("send").addEventListener("click", async () => {
  const input = document.getElementById("query");
  const query = input.value.trim();
  const subject = document.getElementById("subject").value;
  if (!query) { line("bot-response", "Please enter a question."); return; }
  line("user-query", query);
  try {
    const resp = await fetch("/api/get_answer", {
      method: "POST",
      headers: {"Content-Type": "application/json"},
      body: JSON.stringify({query, subject}),
    });
    const data = await resp.json();
    line("bot-response", data.answer);
  } catch (err) {
    line("bot-response", "Error fetching the response. Please try again.");
  }
  input.value = "";
});
</script>
</body>
</html>
"##;

pub const LOGIN_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Login</title>
<!--STYLE-->
</head>
<body>
<div class="container">
  <h1>Login</h1>
  <form method="POST" action="/login">
    <input type="text" name="username" placeholder="Username" required>
    <input type="password" name="password" placeholder="Password" required>
    <button type="submit">Login</button>
  </form>
  <p>Don't have an account? <a href="/signup">Sign Up</a></p>
</div>
</body>
</html>
"##;

pub const SIGNUP_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Signup</title>
<!--STYLE-->
</head>
<body>
<div class="container">
  <h1>Sign Up</h1>
  <form method="POST" action="/signup">
    <input type="text" name="username" placeholder="Username" required>
    <input type="password" name="password" placeholder="Password" required>
    <button type="submit">Sign Up</button>
  </form>
  <p>Already have an account? <a href="/login">Login</a></p>
</div>
</body>
</html>
"##;

pub const ADD_QUESTION_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Add Question</title>
<!--STYLE-->
</head>
<body>
<div class="container">
  <h1>Add New Question</h1>
  <form method="POST" action="/add_question">
    <select name="subject" required>
      <option value="math">Math</option>
      <option value="science">Science</option>
      <option value="social">Social Science</option>
    </select>
    <textarea name="question" placeholder="Question" required></textarea>
    <textarea name="answer" placeholder="Answer" required></textarea>
    <button type="submit">Submit</button>
  </form>
</div>
</body>
</html>
"##;

/// Inline the shared stylesheet into a page constant.
pub fn page(template: &str) -> String {
    template.replacen("<!--STYLE-->", STYLE, 1)
}

/// Render the home page for a logged-in `username`, or for an anonymous
/// visitor when `None`.
pub fn render_home(username: Option<&str>) -> String {
    let nav = match username {
        Some(user) => format!(
            "<p>Welcome, {}! <a href=\"/logout\">Logout</a></p>\n  \
             <a href=\"/add_question\">Add New Question</a>",
            escape_html(user)
        ),
        None => "<a href=\"/login\">Login</a> | <a href=\"/signup\">Signup</a>".to_owned(),
    };
    page(INDEX_HTML).replacen(NAV_SLOT, &nav, 1)
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
