use super::errors::QueryError;

pub type QueryResult<T> = Result<T, QueryError>;
