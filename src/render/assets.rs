//! Static browser assets served from memory.

/// Inlined in `<head>` so a visitor without a stored theme gets the system
/// scheme before first paint.
pub const THEME_BOOTSTRAP: &str = r#"(function(){var r=document.documentElement;if(r.dataset.theme==='system'&&window.matchMedia&&matchMedia('(prefers-color-scheme: dark)').matches){r.classList.add('dark');var i=document.getElementById('darkToggleIcon');if(i)i.textContent='light_mode';}})();"#;

pub const SITE_JS: &str = r#"(function () {
  var root = document.documentElement;

  var darkIcon = document.getElementById('darkToggleIcon');
  if (darkIcon) darkIcon.textContent = root.classList.contains('dark') ? 'light_mode' : 'dark_mode';

  var darkToggle = document.getElementById('darkToggle');
  if (darkToggle) {
    darkToggle.addEventListener('click', function (e) {
      e.preventDefault();
      var system = window.matchMedia && matchMedia('(prefers-color-scheme: dark)').matches ? 'dark' : 'light';
      location.href = darkToggle.getAttribute('href') + '&system=' + system;
    });
  }

  var menu = document.getElementById('navMenu');
  var burger = document.getElementById('navHamburger');
  if (menu && burger) {
    burger.addEventListener('click', function () {
      var open = menu.classList.toggle('open');
      menu.setAttribute('aria-hidden', open ? 'false' : 'true');
      burger.setAttribute('aria-expanded', open ? 'true' : 'false');
    });
    menu.querySelectorAll('a').forEach(function (a) {
      a.addEventListener('click', function () {
        menu.classList.remove('open');
        menu.setAttribute('aria-hidden', 'true');
        burger.setAttribute('aria-expanded', 'false');
      });
    });
  }

  if (window.hljs) {
    document.querySelectorAll('pre code').forEach(function (block) { hljs.highlightElement(block); });
  }

  document.querySelectorAll('.copy-btn').forEach(function (btn) {
    btn.addEventListener('click', function () {
      var code = btn.parentElement.querySelector('code');
      navigator.clipboard.writeText(code ? code.innerText : '').then(function () {
        btn.textContent = 'Copied!';
        setTimeout(function () { btn.textContent = 'Copy'; }, 1200);
      }, function () { btn.textContent = 'Error'; });
    });
  });

  var copyEmail = document.getElementById('copyEmail');
  if (copyEmail) {
    copyEmail.addEventListener('click', function () {
      navigator.clipboard.writeText(copyEmail.dataset.email || '');
      copyEmail.title = 'Copied!';
      setTimeout(function () { copyEmail.title = 'Copy email'; }, 1200);
    });
  }

  var post = document.getElementById('post');
  var bar = document.getElementById('progressbar');
  if (post && bar) {
    var update = function () {
      var total = Math.max(1, post.scrollHeight - window.innerHeight);
      var scrolled = Math.min(Math.max(window.scrollY - post.offsetTop, 0), total);
      bar.style.width = (scrolled / total) * 100 + '%';
    };
    window.addEventListener('scroll', update, { passive: true });
    window.addEventListener('resize', update);
    update();
  }

  var tocItems = document.getElementById('tocItems');
  if (post && tocItems && 'IntersectionObserver' in window) {
    var links = Array.prototype.slice.call(tocItems.querySelectorAll('a'));
    var observer = new IntersectionObserver(function (entries) {
      entries.forEach(function (entry) {
        var link = links.find(function (a) { return a.getAttribute('href') === '#' + entry.target.id; });
        if (link) link.style.fontWeight = entry.isIntersecting ? '700' : '400';
      });
    }, { rootMargin: '0px 0px -70% 0px', threshold: 0.01 });
    post.querySelectorAll('h2[id], h3[id]').forEach(function (h) { observer.observe(h); });
  }
})();
"#;

pub const SITE_CSS: &str = r#":root { color-scheme: light; --bg: #ffffff; --fg: #0f172a; --muted: #64748b; --accent: #2563eb; --border: #e2e8f0; }
html.dark { color-scheme: dark; --bg: #020617; --fg: #e2e8f0; --muted: #94a3b8; --accent: #60a5fa; --border: #1e293b; }
body { margin: 0; background: var(--bg); color: var(--fg); font-family: system-ui, sans-serif; line-height: 1.6; }
a { color: var(--accent); }
.header-inner, .footer-inner, .max-container { max-width: 72rem; margin: 0 auto; padding: 1rem; display: flex; align-items: center; justify-content: space-between; gap: 1rem; flex-wrap: wrap; }
.nav-menu { display: flex; gap: 1rem; }
.hamburger-btn { display: none; }
@media (max-width: 640px) { .hamburger-btn { display: inline-block; } .nav-menu { display: none; } .nav-menu.open { display: flex; flex-direction: column; } }
.section { padding: 4rem 0; }
.border-t { border-top: 1px solid var(--border); }
.card-grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); width: 100%; }
.card { border: 1px solid var(--border); border-radius: 0.75rem; overflow: hidden; }
.card-link { color: inherit; text-decoration: none; display: block; }
.card-img { width: 100%; aspect-ratio: 16 / 9; object-fit: cover; }
.card-body { padding: 1rem; }
.tag-pill { display: inline-block; padding: 0.1rem 0.6rem; border-radius: 999px; border: 1px solid var(--border); font-size: 0.8rem; }
.btn, .btn-outline { display: inline-block; padding: 0.5rem 1rem; border-radius: 0.5rem; text-decoration: none; border: 1px solid var(--accent); }
.btn { background: var(--accent); color: var(--bg); }
.active-filter { background: var(--accent); color: var(--bg); }
.progress-bar { position: fixed; top: 0; inset-inline-start: 0; height: 3px; width: 0; background: var(--accent); z-index: 50; }
.post-layout { max-width: 56rem; margin: 0 auto; padding: 2rem 1rem; }
.post-meta { display: flex; gap: 0.5rem; flex-wrap: wrap; color: var(--muted); }
.toc a { display: block; }
pre { position: relative; overflow-x: auto; }
.copy-btn { position: absolute; top: 0.5rem; inset-inline-end: 0.5rem; }
.text-red-600 { color: #dc2626; }
"#;
