//! Sample e-commerce database used by the interactive binary and the tests.
use crate::*;
use sqlx::SqlitePool;

pub const ECOMMERCE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS Customers (
    customer_id   INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT UNIQUE,
    city          TEXT,
    signup_date   DATE
);

CREATE TABLE IF NOT EXISTS Employees (
    employee_id   INTEGER PRIMARY KEY,
    name          TEXT,
    role          TEXT,
    hire_date     DATE,
    salary        REAL
);

CREATE TABLE IF NOT EXISTS Departments (
    department_id INTEGER PRIMARY KEY,
    name          TEXT,
    manager_id    INTEGER,
    FOREIGN KEY(manager_id) REFERENCES Employees(employee_id)
);

CREATE TABLE IF NOT EXISTS Products (
    product_id    INTEGER PRIMARY KEY,
    name          TEXT,
    category      TEXT,
    price         REAL,
    department_id INTEGER,
    FOREIGN KEY(department_id) REFERENCES Departments(department_id)
);

CREATE TABLE IF NOT EXISTS Inventory (
    inventory_id  INTEGER PRIMARY KEY,
    product_id    INTEGER,
    stock_level   INTEGER,
    last_update   DATETIME,
    FOREIGN KEY(product_id) REFERENCES Products(product_id)
);

CREATE TABLE IF NOT EXISTS Orders (
    order_id      INTEGER PRIMARY KEY,
    customer_id   INTEGER,
    employee_id   INTEGER,
    order_date    DATETIME,
    status        TEXT,
    FOREIGN KEY(customer_id) REFERENCES Customers(customer_id),
    FOREIGN KEY(employee_id) REFERENCES Employees(employee_id)
);

CREATE TABLE IF NOT EXISTS OrderItems (
    order_item_id INTEGER PRIMARY KEY,
    order_id      INTEGER,
    product_id    INTEGER,
    quantity      INTEGER,
    unit_price    REAL,
    FOREIGN KEY(order_id) REFERENCES Orders(order_id),
    FOREIGN KEY(product_id) REFERENCES Products(product_id)
);

CREATE TABLE IF NOT EXISTS Payments (
    payment_id    INTEGER PRIMARY KEY,
    order_id      INTEGER,
    amount        REAL,
    payment_date  DATETIME,
    method        TEXT,
    FOREIGN KEY(order_id) REFERENCES Orders(order_id)
);
";

pub const SAMPLE_DATA: &str = r"
INSERT INTO Customers (name, email, city, signup_date)
VALUES ('Alice', 'alice@example.com', 'Mumbai', '2024-02-12'),
       ('Bob', 'bob@example.com', 'Delhi', '2024-05-21');

INSERT INTO Employees (name, role, hire_date, salary)
VALUES ('Jane', 'Sales Rep', '2023-03-10', 65000),
       ('Mark', 'Manager', '2022-07-01', 90000);

INSERT INTO Departments (name, manager_id)
VALUES ('Electronics', 2), ('Home Appliances', 2);

INSERT INTO Products (name, category, price, department_id)
VALUES ('Laptop', 'Computers', 80000, 1),
       ('Microwave', 'Kitchen', 15000, 2);

INSERT INTO Inventory (product_id, stock_level, last_update)
VALUES (1, 10, '2025-09-01 10:00'), (2, 25, '2025-09-01 10:00');

INSERT INTO Orders (customer_id, employee_id, order_date, status)
VALUES (1, 1, '2025-09-10 15:30', 'Shipped');

INSERT INTO OrderItems (order_id, product_id, quantity, unit_price)
VALUES (1, 1, 1, 80000);

INSERT INTO Payments (order_id, amount, payment_date, method)
VALUES (1, 80000, '2025-09-11 09:00', 'Credit Card');
";

/// Create the sample schema if missing and fill it once.
///
/// Rows are only inserted while `Customers` is empty, so seeding an existing
/// database changes nothing.
#[tracing::instrument(skip_all)]
pub async fn seed(pool: &SqlitePool) -> Result {
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(ECOMMERCE_SCHEMA).execute(&mut *tx).await?;

    let customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Customers")
        .fetch_one(&mut *tx)
        .await?;
    if customers == 0 {
        sqlx::raw_sql(SAMPLE_DATA).execute(&mut *tx).await?;
        info!("Seeded sample e-commerce data");
    } else {
        debug!("Database already holds {customers} customers, not seeding");
    }

    tx.commit().await?;
    Ok(())
}
