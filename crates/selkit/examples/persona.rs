//! Build the persona query and print it in every placeholder style.
//!
//! Run with: cargo run --example persona -p selkit

use selkit::{ColumnDef, Placeholder, QueryError, Relation, RenderConfig, Select, Value};

fn main() -> Result<(), QueryError> {
    let mut persona = Relation::new("persona")?;
    let nome = persona.register(ColumnDef::new("nome").size(45).sql_type("VARCHAR").nullable(true))?;
    let eta = persona.register(ColumnDef::new("eta").size(3).sql_type("INT").nullable(true))?;

    let mut stmt = Select::new();
    stmt.select([&nome], Some(&persona))
        .where_clause(nome.eq("Mario")?)
        .where_clause(eta.lt(3)?)
        .where_clause(nome.ne(Value::Null)?);

    println!("=== ? placeholders ===");
    let rendered = stmt.render();
    println!("{}", rendered.sql);
    println!("params: {:?}", rendered.params);

    println!("\n=== $n placeholders ===");
    println!("{}", stmt.render_with(&RenderConfig::postgres()));

    println!("\n=== %s placeholders ===");
    let format = RenderConfig::new().with_placeholder(Placeholder::Format);
    println!("{}", stmt.render_with(&format));

    println!("\n=== debug ===");
    println!("{}", stmt.to_debug_sql());

    // Rejected before any SQL is produced.
    println!("\n=== validation ===");
    match eta.eq(1000) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("{e}"),
    }

    Ok(())
}
