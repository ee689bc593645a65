use clap::Args;
use shastra_catalog::table::Table as _;
use shastra_research::parameter::ParameterRegistry;

use super::ResearchArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    #[clap(flatten)]
    pub research: ResearchArg,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let session = arg.research.load()?;
    println!("{session}");

    let columns = session.table().column_names().collect::<Vec<_>>();
    println!("Columns: {}", columns.join(", "));

    for (parameter, column) in missing_columns(session.parameters(), &columns) {
        eprintln!("warning: parameter '{parameter}' reads missing column '{column}'");
    }

    let total = session.table().len();
    for sample in session.samples() {
        let found = session
            .table()
            .rows_where_id_in(&sample.ids().iter().map(String::as_str).collect())
            .len();
        if found < sample.len() {
            eprintln!(
                "warning: {} of {} identifiers in '{}' are not in the catalog ({total} rows)",
                sample.len() - found,
                sample.len(),
                sample.name()
            );
        }
    }
    Ok(())
}

/// Pairs of (parameter, column) where the parameter reads a column the
/// catalog does not have.
fn missing_columns<'a>(
    parameters: &'a ParameterRegistry,
    columns: &[&str],
) -> Vec<(&'a str, &'a str)> {
    parameters
        .iter()
        .flat_map(|parameter| {
            parameter
                .expr
                .referenced_columns()
                .into_iter()
                .filter(|column| !columns.contains(column))
                .map(|column| (parameter.name.as_str(), column))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use shastra_catalog::expr::ColumnExpr;
    use shastra_research::parameter::Parameter;

    use super::*;

    #[test]
    fn test_missing_columns() {
        let parameters = ParameterRegistry::new()
            .with(Parameter::column("mass"))
            .unwrap()
            .with(Parameter::new(
                "color",
                ColumnExpr::column("g").minus(ColumnExpr::column("r")),
            ))
            .unwrap();
        assert_eq!(
            missing_columns(&parameters, &["mass", "g"]),
            [("color", "r")]
        );
        assert!(missing_columns(&parameters, &["mass", "g", "r"]).is_empty());
    }
}
