use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, id_filters, stderr, stdout};

const GREETING: &str = r#"{namespace app}
{template .greet}
  {msg desc="greeting"}Hello, {$name}!{/msg}
{/template}
"#;

#[test]
fn test_greeting() -> Result<()> {
    let test = CliTest::with_file("templates/app.soy", GREETING)?;

    let output = test.extract(&["templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stderr(&output), "");

    insta::with_settings!({ filters => id_filters() }, {
        assert_snapshot!(stdout(&output), @r#"
        msgid ""
        msgstr ""
        "Project-Id-Version: PACKAGE VERSION\n"
        "MIME-Version: 1.0\n"
        "Content-Type: text/plain; charset=UTF-8\n"
        "Content-Transfer-Encoding: 8bit\n"
        "Plural-Forms: nplurals=2; plural=(n != 1);\n"

        #. greeting
        #: templates/app.soy:3
        #: id=[ID]
        msgid "Hello, {NAME}!"
        msgstr ""
        "#);
    });

    Ok(())
}

#[test]
fn test_plural_and_context() -> Result<()> {
    let test = CliTest::with_file(
        "templates/files.soy",
        r#"{namespace files}

{template .count}
  {msg desc="Number of files in the folder" meaning="folder"}
    {plural $count}
      {case 1}One file
      {default}{$count} files
    {/plural}
  {/msg}
{/template}
"#,
    )?;

    let output = test.extract(&["templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));

    insta::with_settings!({ filters => id_filters() }, {
        assert_snapshot!(stdout(&output), @r#"
        msgid ""
        msgstr ""
        "Project-Id-Version: PACKAGE VERSION\n"
        "MIME-Version: 1.0\n"
        "Content-Type: text/plain; charset=UTF-8\n"
        "Content-Transfer-Encoding: 8bit\n"
        "Plural-Forms: nplurals=2; plural=(n != 1);\n"

        #. Number of files in the folder
        #: templates/files.soy:4
        #: id=[ID] var=count
        msgctxt "folder"
        msgid "One file"
        msgid_plural "{COUNT} files"
        msgstr[0] ""
        msgstr[1] ""
        "#);
    });

    Ok(())
}

#[test]
fn test_templates_and_messages_in_order() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "templates/b.soy",
        r#"{namespace shop}
{template .cart}
  {msg desc="first"}Your cart{/msg}
  {if $empty}
    {msg desc="second"}Nothing here yet{/msg}
  {else}
    {msg desc="third"}Checkout{/msg}
  {/if}
{/template}
"#,
    )?;
    test.write_file(
        "templates/a.soy",
        r#"{namespace account}
{template .login}
  {msg desc="login"}Sign in{/msg}
{/template}
"#,
    )?;

    let output = test.extract(&["templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));

    let msgids: Vec<String> = stdout(&output)
        .lines()
        .filter(|line| line.starts_with("msgid \"") && *line != "msgid \"\"")
        .map(str::to_string)
        .collect();
    assert_eq!(
        msgids,
        vec![
            "msgid \"Sign in\"",
            "msgid \"Your cart\"",
            "msgid \"Nothing here yet\"",
            "msgid \"Checkout\"",
        ]
    );

    Ok(())
}

#[test]
fn test_output_is_deterministic() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("templates/app.soy", GREETING)?;
    test.write_file(
        "templates/more/other.soy",
        r#"{namespace other}
{template .a}{msg desc="a"}{$user.firstName} paid {$amount}{/msg}{/template}
{template .b}{msg desc="b"}{plural $n}{case 1}one{default}{$n} more{/plural}{/msg}{/template}
"#,
    )?;

    let first = test.extract(&["templates"])?;
    let second = test.extract(&["templates"])?;
    assert!(first.status.success(), "{}", stderr(&first));
    assert_eq!(first.stdout, second.stdout);
    assert!(stdout(&first).contains("msgid \"{FIRST_NAME} paid {AMOUNT}\""));

    Ok(())
}

#[test]
fn test_directory_walk_skips_other_files() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("templates/app.soy", GREETING)?;
    test.write_file("templates/readme.md", "not a template {")?;
    test.write_file("templates/app.soy.bak", "{broken")?;

    let output = test.extract(&["templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).matches("msgid \"Hello, {NAME}!\"").count(), 1);

    Ok(())
}

#[test]
fn test_no_messages_gives_header_only() -> Result<()> {
    let test = CliTest::with_file(
        "app.soy",
        "{namespace app}\n{template .empty}<div></div>{/template}\n",
    )?;

    let output = test.extract(&["app.soy"])?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("msgid \"\"\nmsgstr \"\"\n"));
    assert!(!stdout(&output).contains("#:"));

    Ok(())
}

#[test]
fn test_repeated_message_is_written_once() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "templates/a.soy",
        "{namespace a}\n{template .t}\n  {msg desc=\"save\"}Save{/msg}\n{/template}\n",
    )?;
    test.write_file(
        "templates/b.soy",
        "{namespace b}\n{template .t}\n\n  {msg desc=\"save\"}Save{/msg}\n{/template}\n",
    )?;

    let output = test.extract(&["templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = stdout(&output);
    assert_eq!(stdout.matches("msgid \"Save\"").count(), 1, "{stdout}");
    assert!(stdout.contains("#: templates/a.soy:3\n"), "{stdout}");
    assert!(stdout.contains("#: templates/b.soy:4\n"), "{stdout}");

    Ok(())
}
