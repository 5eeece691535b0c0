//! Embedded page templates.

use minijinja::Environment;
use serde::Serialize;

use super::error::WebResult;

const LAYOUT: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }} - platform-cli</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
    nav { width: 14rem; background: #1f2933; color: #f5f7fa; padding: 1rem; }
    nav a { display: block; color: #cbd2d9; padding: .4rem 0; text-decoration: none; }
    nav a.active { color: #fff; font-weight: bold; }
    main { flex: 1; padding: 1.5rem 2rem; }
    header.identity { color: #52606d; margin-bottom: 1rem; }
    table { border-collapse: collapse; margin: .5rem 0 1.5rem; }
    th, td { border-bottom: 1px solid #e4e7eb; padding: .35rem .8rem; text-align: left; }
    form.inline { display: inline; }
    fieldset { margin-bottom: 1.5rem; border: 1px solid #e4e7eb; }
    .notice { padding: .6rem 1rem; margin-bottom: 1rem; border-radius: 4px; }
    .notice.success { background: #e3f9e5; color: #0e5814; }
    .notice.error { background: #ffe3e3; color: #780a0a; }
    .notice.warning { background: #fffbea; color: #8d2b0b; }
  </style>
</head>
<body>
  <nav>
    <h3>platform-cli</h3>
    <a href="/compute" class="{{ 'active' if section == 'compute' }}">EC2 (Servers)</a>
    <a href="/storage" class="{{ 'active' if section == 'storage' }}">S3 (Storage)</a>
    <a href="/dns" class="{{ 'active' if section == 'dns' }}">Route53 (DNS)</a>
  </nav>
  <main>
    <header class="identity">User: {{ owner }} | Region: {{ region }}</header>
    <h1>{{ title }}</h1>
    {% if notice %}<div class="notice {{ notice.level }}">{{ notice.message }}</div>{% endif %}
    {% if list_error %}<div class="notice error">Error loading list: {{ list_error }}</div>{% endif %}
    {% block content %}{% endblock %}
  </main>
</body>
</html>
"#;

const COMPUTE: &str = r#"{% extends "layout.html" %}
{% block content %}
<fieldset>
  <legend>Launch New Instance</legend>
  <form method="post" action="/compute/launch">
    <label>Server Name <input name="name" value="{{ default_name }}"></label>
    <label>SSH Key Name <input name="key_name" required></label>
    <label>Type
      <select name="instance_type">
        {% for t in allowed_types %}<option value="{{ t }}">{{ t }}</option>{% endfor %}
      </select>
    </label>
    <button type="submit">Launch Instance</button>
    <p><small>The AMI is resolved automatically from SSM.</small></p>
  </form>
</fieldset>

<h2>My Active Instances</h2>
{% if instances %}
<table>
  <tr><th>ID</th><th>Name</th><th>State</th><th>Type</th><th>IP</th><th></th></tr>
  {% for i in instances %}
  <tr>
    <td>{{ i.instance_id }}</td>
    <td>{{ i.name or "Unknown" }}</td>
    <td>{{ i.state }}</td>
    <td>{{ i.instance_type }}</td>
    <td>{{ i.public_ip or "No IP" }}</td>
    <td>
      <form class="inline" method="post" action="/compute/{{ i.instance_id }}/start"><button>Start</button></form>
      <form class="inline" method="post" action="/compute/{{ i.instance_id }}/stop"><button>Stop</button></form>
      <form class="inline" method="post" action="/compute/{{ i.instance_id }}/terminate"
            onsubmit="return confirm('Terminate {{ i.instance_id }}? Data will be lost.')"><button>Terminate</button></form>
    </td>
  </tr>
  {% endfor %}
</table>
{% else %}
<p>No active instances found.</p>
{% endif %}
{% endblock %}
"#;

const STORAGE: &str = r#"{% extends "layout.html" %}
{% block content %}
<fieldset>
  <legend>Create Bucket</legend>
  <form method="post" action="/storage/buckets">
    <label>Bucket Name (lowercase only!) <input name="name"></label>
    <label><input type="checkbox" name="public" value="on"> Make Public? (Dangerous)</label>
    <label><input type="checkbox" name="confirm" value="on"> I understand the risks</label>
    <button type="submit">Create Bucket</button>
  </form>
</fieldset>

<h2>My Buckets</h2>
{% if buckets %}
<table>
  <tr><th>Bucket Name</th><th>Creation Date</th></tr>
  {% for b in buckets %}<tr><td>{{ b.name }}</td><td>{{ b.created_at or "-" }}</td></tr>{% endfor %}
</table>

<fieldset>
  <legend>Upload file</legend>
  <form method="post" action="/storage/upload" enctype="multipart/form-data">
    <select name="bucket">
      {% for b in buckets %}<option value="{{ b.name }}">{{ b.name }}</option>{% endfor %}
    </select>
    <input type="file" name="file">
    <button type="submit">Upload</button>
  </form>
</fieldset>
{% else %}
<p>No buckets found.</p>
{% endif %}
{% endblock %}
"#;

const DNS: &str = r#"{% extends "layout.html" %}
{% block content %}
<fieldset>
  <legend>Create Hosted Zone</legend>
  <form method="post" action="/dns/zones">
    <label>Domain (e.g., project.com) <input name="domain"></label>
    <button type="submit">Create Zone</button>
  </form>
</fieldset>

<h2>My Zones</h2>
{% if zones %}
<table>
  <tr><th>Domain</th><th>ID</th><th>Records</th></tr>
  {% for z in zones %}
  <tr>
    <td><a href="/dns?zone={{ z.id }}">{{ z.name }}</a></td>
    <td>{{ z.id }}</td>
    <td>{{ z.record_count }}</td>
  </tr>
  {% endfor %}
</table>

{% if selected %}
<h2>Manage Records: {{ selected.name }}</h2>
<fieldset>
  <legend>Add A-Record</legend>
  <form method="post" action="/dns/records">
    <input type="hidden" name="zone_id" value="{{ selected.id }}">
    <label>Subdomain <input name="subdomain" value="www"></label>
    <label>IP Address <input name="ip" value="1.2.3.4"></label>
    <button type="submit">Add Record</button>
  </form>
</fieldset>

<h3>Existing A-Records</h3>
{% if records %}
<table>
  <tr><th>Name</th><th>Value</th><th>TTL</th><th></th></tr>
  {% for r in records %}
  <tr>
    <td>{{ r.name }}</td>
    <td>{{ r["values"]|join(", ") }}</td>
    <td>{{ r.ttl }}</td>
    <td>
      <form class="inline" method="post" action="/dns/records/delete">
        <input type="hidden" name="zone_id" value="{{ selected.id }}">
        <input type="hidden" name="name" value="{{ r.name }}">
        <input type="hidden" name="ttl" value="{{ r.ttl }}">
        <input type="hidden" name="values" value="{{ r["values"]|join(",") }}">
        <button type="submit">Delete</button>
      </form>
    </td>
  </tr>
  {% endfor %}
</table>
{% else %}
<p>No A-records found.</p>
{% endif %}
{% endif %}
{% else %}
<p>No zones found.</p>
{% endif %}
{% endblock %}
"#;

/// Page templates compiled once at startup.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> WebResult<Self> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("compute.html", COMPUTE)?;
        env.add_template("storage.html", STORAGE)?;
        env.add_template("dns.html", DNS)?;

        Ok(Self { env })
    }

    /// Render a page template with the given context.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> WebResult<String> {
        let tmpl = self.env.get_template(name)?;
        Ok(tmpl.render(ctx)?)
    }
}
