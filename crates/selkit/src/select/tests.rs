use super::*;
use crate::column::ColumnDef;
use crate::config::Placeholder;
use crate::error::QueryError;
use crate::fragment::{Connective, Fragment};
use crate::value::Value;

struct Schema {
    persona: Relation,
    nome: Column,
    eta: Column,
    impiego: Relation,
    persona_id: Column,
    stipendio: Column,
}

fn schema() -> Schema {
    let mut persona = Relation::new("persona").unwrap();
    let nome = persona
        .register(ColumnDef::new("nome").size(45).sql_type("VARCHAR").nullable(true))
        .unwrap();
    let eta = persona
        .register(ColumnDef::new("eta").size(3).sql_type("INT").nullable(true))
        .unwrap();
    persona
        .register(ColumnDef::new("id").sql_type("INT"))
        .unwrap();

    let mut impiego = Relation::new("impiego").unwrap();
    let persona_id = impiego
        .register(ColumnDef::new("persona_id").sql_type("INT"))
        .unwrap();
    let stipendio = impiego
        .register(ColumnDef::new("stipendio").sql_type("DECIMAL"))
        .unwrap();

    Schema {
        persona,
        nome,
        eta,
        impiego,
        persona_id,
        stipendio,
    }
}

#[test]
fn test_empty_select() {
    let stmt = Select::new();
    assert_eq!(stmt.to_sql(), "SELECT *;");
}

#[test]
fn test_persona_scenario() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.persona))
        .where_clause(s.nome.eq("Mario").unwrap())
        .where_clause(s.eta.lt(3).unwrap())
        .where_clause(s.nome.ne(Value::Null).unwrap());

    let rendered = stmt.render();
    assert_eq!(
        rendered.sql,
        "SELECT `persona`.`nome` FROM `persona` WHERE `persona`.`nome` = ? \
         AND `persona`.`eta` < ? AND `persona`.`nome` IS NOT NULL;"
    );
    assert_eq!(rendered.params, vec![Value::from("Mario"), Value::from(3)]);
}

#[test]
fn test_render_is_repeatable() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.persona))
        .where_clause(s.nome.eq("x").unwrap())
        .limit(5, None)
        .unwrap();
    assert_eq!(stmt.render(), stmt.render());
}

#[test]
fn test_from_dropped_when_relation_mismatch() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.impiego));
    assert_eq!(stmt.to_sql(), "SELECT `persona`.`nome`;");
    assert!(stmt.from_relation().is_none());
}

#[test]
fn test_from_dropped_without_columns() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select(Vec::<ColumnRef>::new(), Some(&s.persona));
    assert_eq!(stmt.to_sql(), "SELECT *;");
}

#[test]
fn test_from_dropped_for_raw_first_column() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([ColumnRef::from("nome"), ColumnRef::from(&s.eta)], Some(&s.persona));
    assert_eq!(stmt.to_sql(), "SELECT `nome`, `persona`.`eta`;");
}

#[test]
fn test_select_replaces_previous() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.persona));
    stmt.select([&s.eta], None);
    assert_eq!(stmt.to_sql(), "SELECT `persona`.`eta`;");
}

#[test]
fn test_between_scenario() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.eta], Some(&s.persona))
        .where_clause(s.eta.between(0, 14).unwrap());
    let rendered = stmt.render();
    assert!(rendered.sql.ends_with("WHERE `persona`.`eta` BETWEEN ? AND ?;"));
    assert_eq!(rendered.params, vec![Value::from(0), Value::from(14)]);
}

#[test]
fn test_limit_offset() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.persona))
        .limit(5, Some(10))
        .unwrap();
    assert!(stmt.to_sql().ends_with(" LIMIT 5 OFFSET 10;"));
}

#[test]
fn test_limit_zero_is_rendered() {
    let mut stmt = Select::new();
    stmt.limit(0, None).unwrap();
    assert_eq!(stmt.to_sql(), "SELECT * LIMIT 0;");
}

#[test]
fn test_negative_limit_leaves_state() {
    let mut stmt = Select::new();
    stmt.limit(5, Some(2)).unwrap();
    let before = stmt.clone();

    let err = stmt.limit(-1, None).unwrap_err();
    assert_eq!(err, QueryError::Usage(UsageError::NegativeLimit(-1)));
    let err = stmt.limit(7, Some(-3)).unwrap_err();
    assert_eq!(err, QueryError::Usage(UsageError::NegativeOffset(-3)));

    assert_eq!(stmt, before);
    assert_eq!(stmt.limit_value(), Some(5));
    assert_eq!(stmt.offset_value(), Some(2));
}

#[test]
fn test_where_raw_and_empty() {
    let mut stmt = Select::new();
    stmt.where_clause("`eta` > 18 OR `eta` IS NULL")
        .where_clause(None::<Fragment>)
        .where_clause("");
    let rendered = stmt.render();
    assert_eq!(rendered.sql, "SELECT * WHERE `eta` > 18 OR `eta` IS NULL;");
    assert!(rendered.params.is_empty());
    assert_eq!(stmt.conditions().len(), 1);
}

#[test]
fn test_raw_question_mark_is_not_a_placeholder() {
    let mut stmt = Select::new();
    stmt.where_clause("`note` LIKE '%?%'");
    let rendered = stmt.render_with(&RenderConfig::postgres());
    assert_eq!(rendered.sql, "SELECT * WHERE `note` LIKE '%?%'");
}

#[test]
fn test_order_by_accumulates() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.persona))
        .order_by(&s.eta)
        .order_by_all([ColumnRef::from("cognome"), ColumnRef::from(&s.nome)])
        .order_by_desc("creato");
    assert_eq!(
        stmt.to_sql(),
        "SELECT `persona`.`nome` FROM `persona` ORDER BY `persona`.`eta`, `cognome`, \
         `persona`.`nome`, `creato` DESC;"
    );
}

#[test]
fn test_join_renders_before_where() {
    let s = schema();
    let id = s.persona.lookup("id").unwrap();
    let mut stmt = Select::new();
    stmt.select([&s.nome, &s.stipendio], Some(&s.persona));
    stmt.join(&s.impiego)
        .unwrap()
        .on(s.persona_id.eq(&id).unwrap(), None)
        .unwrap()
        .on(s.stipendio.gt(1000).unwrap(), Some(Connective::And))
        .unwrap();
    stmt.where_clause(s.nome.eq("Mario").unwrap());

    let rendered = stmt.render();
    assert_eq!(
        rendered.sql,
        "SELECT `persona`.`nome`, `impiego`.`stipendio` FROM `persona` \
         INNER JOIN `impiego` ON `impiego`.`persona_id` = `persona`.`id` \
         AND `impiego`.`stipendio` > ? WHERE `persona`.`nome` = ?;"
    );
    assert_eq!(rendered.params, vec![Value::from(1000), Value::from("Mario")]);
}

#[test]
fn test_duplicate_join_rejected() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.left_join(&s.impiego)
        .unwrap()
        .on(s.stipendio.ge(10).unwrap(), None)
        .unwrap();

    let err = stmt.join(&s.impiego).unwrap_err();
    assert_eq!(
        err,
        QueryError::Usage(UsageError::DuplicateJoin {
            relation: "impiego".into()
        })
    );
    // Bare names share the relation's identity.
    assert!(stmt.join("impiego").is_err());

    assert_eq!(stmt.joins().len(), 1);
    assert_eq!(stmt.joins()[0].kind(), JoinKind::Left);
    assert_eq!(stmt.joins()[0].conditions().len(), 1);
}

#[test]
fn test_join_clause_mut_adds_later_conditions() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.join("impiego")
        .unwrap()
        .on(s.stipendio.gt(1).unwrap(), None)
        .unwrap();
    stmt.join_clause_mut("impiego")
        .unwrap()
        .unwrap()
        .or_on(s.stipendio.lt(0).unwrap())
        .unwrap();
    assert_eq!(
        stmt.to_sql(),
        "SELECT * INNER JOIN `impiego` ON `impiego`.`stipendio` > ? OR `impiego`.`stipendio` < ?;"
    );
    assert!(stmt.join_clause_mut("persona").unwrap().is_none());
}

#[test]
fn test_joins_keep_insertion_order() {
    let mut stmt = Select::new();
    stmt.right_join("b").unwrap();
    stmt.join("a").unwrap();
    assert_eq!(stmt.to_sql(), "SELECT * RIGHT JOIN `b` INNER JOIN `a`;");
}

#[test]
fn test_numbered_placeholders_follow_text_order() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.join(&s.impiego)
        .unwrap()
        .on(s.stipendio.between(1, 2).unwrap(), None)
        .unwrap();
    stmt.where_clause(s.nome.eq("a").unwrap())
        .where_clause(s.nome.is_null().unwrap())
        .where_clause(s.eta.ge(1).unwrap());

    let rendered = stmt.render_with(&RenderConfig::postgres());
    assert_eq!(
        rendered.sql,
        "SELECT * INNER JOIN `impiego` ON `impiego`.`stipendio` BETWEEN $1 AND $2 \
         WHERE `persona`.`nome` = $3 AND `persona`.`nome` IS NULL AND `persona`.`eta` >= $4"
    );
    assert_eq!(rendered.params.len(), 4);
    assert_eq!(rendered.params_ref().len(), 4);
}

#[test]
fn test_format_placeholders() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.where_clause(s.eta.lt(3).unwrap());
    let cfg = RenderConfig::new().with_placeholder(Placeholder::Format);
    assert_eq!(stmt.render_with(&cfg).sql, "SELECT * WHERE `persona`.`eta` < %s;");
}

#[test]
fn test_debug_sql_inlines_literals() {
    let s = schema();
    let mut stmt = Select::new();
    stmt.select([&s.nome], Some(&s.persona))
        .where_clause(s.nome.eq("Mario' AND 1=1").unwrap())
        .where_clause(s.eta.lt(3).unwrap());
    assert_eq!(
        stmt.to_debug_sql(),
        "SELECT `persona`.`nome` FROM `persona` WHERE `persona`.`nome` = 'Mario'' AND 1=1' \
         AND `persona`.`eta` < 3;"
    );
    // The executable form still binds.
    assert_eq!(stmt.render().params.len(), 2);
}

#[test]
fn test_combined_fragment_in_where() {
    let s = schema();
    let mut stmt = Select::new();
    let young_or_unknown = s.eta.lt(18).unwrap().or(s.eta.is_null().unwrap());
    stmt.where_clause(s.nome.eq("Mario").unwrap())
        .where_clause(young_or_unknown);
    assert_eq!(
        stmt.to_sql(),
        "SELECT * WHERE `persona`.`nome` = ? AND (`persona`.`eta` < ? OR `persona`.`eta` IS NULL);"
    );
}

#[test]
fn test_open_quote_cannot_swallow_later_markers() {
    let s = schema();
    let err = Fragment::new("`note` = 'it", vec![]).unwrap_err();
    assert_eq!(
        err,
        QueryError::Usage(UsageError::UnterminatedQuote { quote: '\'' })
    );

    let note = Fragment::new("`note` = 'it''s'", vec![]).unwrap();
    let mut stmt = Select::new();
    stmt.where_clause(note.and(s.eta.eq(5).unwrap()));
    let rendered = stmt.render_with(&RenderConfig::postgres());
    assert_eq!(
        rendered.sql,
        "SELECT * WHERE (`note` = 'it''s' AND `persona`.`eta` = $1)"
    );
    assert_eq!(rendered.params, vec![Value::from(5)]);
}
