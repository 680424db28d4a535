/// Documented commands and their help text, sorted by name.
const TOPICS: &[(&str, &str)] = &[
    ("EOF", "End of input: exit the console."),
    (
        "all",
        "Print every record, or only records of one kind.\n\
         Usage: all [<class>]  |  <class>.all()",
    ),
    (
        "count",
        "Print the number of records of a kind.\n\
         Usage: count <class>  |  <class>.count()",
    ),
    (
        "create",
        "Create a record of a kind, save it, and print its id.\n\
         Usage: create <class>",
    ),
    (
        "destroy",
        "Delete a record by kind and id, and save the change.\n\
         Usage: destroy <class> <id>  |  <class>.destroy(<id>)",
    ),
    ("help", "List available commands, or show help for one command."),
    ("quit", "Quit command to exit the console."),
    (
        "show",
        "Print the string form of a record by kind and id.\n\
         Usage: show <class> <id>  |  <class>.show(<id>)",
    ),
    (
        "update",
        "Set one attribute of a record and save it.\n\
         Usage: update <class> <id> <attribute> <value>\n\
         \x20      <class>.update(<id>, <attribute>, <value>)\n\
         \x20      <class>.update(<id>, {<attribute>: <value>, ...})",
    ),
];

const HEADER: &str = "Documented commands (type help <topic>):";

/// The command index printed by a bare `help`.
pub fn index() -> String {
    let names: Vec<&str> = TOPICS.iter().map(|(name, _)| *name).collect();
    format!(
        "\n{HEADER}\n{}\n{}\n",
        "=".repeat(HEADER.len()),
        names.join("  ")
    )
}

/// Help text for one command.
pub fn topic(name: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|(topic, _)| *topic == name)
        .map(|(_, text)| *text)
}
