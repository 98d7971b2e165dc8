use crate::model::TransitionMatrix;
use crate::render::table::Table;
use std::collections::HashMap;

/// Render a table as a Mermaid `graph LR` flowchart.
///
/// Node ids `e0, e1, ...` follow the order names first appear on the header
/// axis; row labels missing from the header are numbered after it. Only
/// cells with a count strictly above `min_weight` become edges.
///
/// Example line: e0[login] -- 3 --> e1[logout]
pub fn render_diagram(table: &Table, min_weight: u64) -> String {
    if table.rows.is_empty() || table.columns.is_empty() {
        return String::new();
    }

    let mut ids: HashMap<&str, usize> = HashMap::new();
    let axis = table
        .columns
        .iter()
        .chain(table.rows.iter().map(|r| &r.from));
    for name in axis {
        let next = ids.len();
        ids.entry(name.as_str()).or_insert(next);
    }

    let mut out = String::from("graph LR\n");
    for row in &table.rows {
        let from_id = ids[row.from.as_str()];
        for (to, &weight) in table.columns.iter().zip(&row.counts) {
            if weight <= min_weight {
                continue;
            }
            let to_id = ids[to.as_str()];
            out.push_str(&format!(
                "e{}[{}] -- {} --> e{}[{}]\n",
                from_id, row.from, weight, to_id, to
            ));
        }
    }
    out
}

/// Render a matrix directly; node ids follow its sorted table header.
pub fn render_matrix_diagram(matrix: &TransitionMatrix, min_weight: u64) -> String {
    render_diagram(&Table::from_matrix(matrix), min_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::table::TableRow;
    use pretty_assertions::assert_eq;

    fn table(columns: &[&str], rows: &[(&str, &[u64])]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|(from, counts)| TableRow {
                    from: from.to_string(),
                    counts: counts.to_vec(),
                })
                .collect(),
        }
    }

    fn three_events() -> Table {
        table(
            &["Event1", "Event2", "Event3"],
            &[
                ("Event1", &[0, 2, 3]),
                ("Event2", &[1, 0, 0]),
                ("Event3", &[0, 0, 0]),
            ],
        )
    }

    #[test]
    fn two_node_cycle() {
        let t = table(&["E1", "E2"], &[("E1", &[0, 2]), ("E2", &[1, 0])]);
        assert_eq!(
            render_diagram(&t, 0),
            "graph LR\ne0[E1] -- 2 --> e1[E2]\ne1[E2] -- 1 --> e0[E1]\n"
        );
    }

    #[test]
    fn zero_threshold_keeps_every_nonzero_edge() {
        assert_eq!(
            render_diagram(&three_events(), 0),
            "graph LR\n\
             e0[Event1] -- 2 --> e1[Event2]\n\
             e0[Event1] -- 3 --> e2[Event3]\n\
             e1[Event2] -- 1 --> e0[Event1]\n"
        );
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(
            render_diagram(&three_events(), 2),
            "graph LR\ne0[Event1] -- 3 --> e2[Event3]\n"
        );
        assert_eq!(render_diagram(&three_events(), 3), "graph LR\n");
    }

    #[test]
    fn degenerate_tables_render_nothing() {
        assert_eq!(render_diagram(&Table::default(), 0), "");
        assert_eq!(render_diagram(&table(&["a"], &[]), 0), "");
        assert_eq!(render_diagram(&table(&[], &[("a", &[])]), 0), "");
    }

    #[test]
    fn ids_follow_header_order_not_sorted_order() {
        let t = table(&["b", "a"], &[("a", &[4, 0]), ("b", &[0, 1])]);
        assert_eq!(
            render_diagram(&t, 0),
            "graph LR\ne1[a] -- 4 --> e0[b]\ne0[b] -- 1 --> e1[a]\n"
        );
    }

    #[test]
    fn row_label_missing_from_header_gets_next_id() {
        let t = table(&["a"], &[("a", &[1]), ("start", &[2])]);
        assert_eq!(
            render_diagram(&t, 0),
            "graph LR\ne0[a] -- 1 --> e0[a]\ne1[start] -- 2 --> e0[a]\n"
        );
    }

    #[test]
    fn matrix_renders_through_sorted_table() {
        let m: TransitionMatrix = [("E2", "E1", 1), ("E1", "E2", 2)].into_iter().collect();
        assert_eq!(
            render_matrix_diagram(&m, 0),
            "graph LR\ne0[E1] -- 2 --> e1[E2]\ne1[E2] -- 1 --> e0[E1]\n"
        );
        assert_eq!(render_matrix_diagram(&m, 0), render_matrix_diagram(&m, 0));
        assert_eq!(render_matrix_diagram(&TransitionMatrix::new(), 0), "");
    }
}
