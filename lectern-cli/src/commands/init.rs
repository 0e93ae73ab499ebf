//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"site:
  title: "My Study Notes"
  author: "Your Name"
  description: "Educational posts with embedded quizzes"
  url: "https://example.com"

paths:
  content: "posts"

# Regexes matched against content-relative paths to skip
# ignore_patterns:
#   - "^drafts/"
"#;

/// Initialize a new lectern project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("✓ lectern initialized in {:?}", root);
    println!("  - Edit lectern.yml to customize site metadata");
    println!("  - Write posts in posts/ as YYYY-MM-DD-title.md");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("lectern.yml");
    if config_path.exists() {
        println!("lectern.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let posts = root.join("posts");
    fs::create_dir_all(&posts).with_context(|| format!("Failed to create {:?}", posts))?;

    let sample = posts.join("2024-01-01-welcome.md");
    if !sample.exists() {
        fs::write(&sample, sample_post())?;
        println!("Created {:?}", sample);
    }

    Ok(())
}

fn sample_post() -> String {
    r#"---
title: Welcome to lectern
date: 2024-01-01 09:00:00 +0000
categories: [Meta]
tags: [welcome]
---

This is a sample post. Posts are markdown files with YAML front matter.

Code samples carry a language tag and an optional filename label:

```java
System.out.println("hello");
```
{: file="Hello.java" }

Quiz questions are a prompt, numbered choices, and a collapsed answer:

Which file extension do posts use?

1. .txt
2. .md
3. .html

<details markdown="1">
<summary>Answer</summary>

2

Posts are plain markdown files.

</details>
"#
    .to_string()
}
