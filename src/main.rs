use linq_view::*;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<(), QueryError> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    println!("== Even numbers ==\n");
    even_numbers()?;

    println!("\n== Live shared source ==\n");
    live_shared_source()?;

    println!("\n== Select ==\n");
    select_plus_one()?;

    println!("\n✓ Done");
    Ok(())
}

fn even_numbers() -> Result<(), QueryError> {
    let numbers = vec![1, 2, 3, 4];
    let even = from(&numbers).filter(|n| n % 2 == 0)?;
    println!("source: {:?}", numbers);
    println!("even:   {:?}", even.to_vec()?);
    println!("{}", even.view_info()?);
    Ok(())
}

fn live_shared_source() -> Result<(), QueryError> {
    let numbers = shared(vec![1, 2, 3, 4]);
    let threes = from_shared(&numbers).filter(equals(3))?;
    let frozen = threes.force_evaluate()?;

    // удаляем 4 из источника
    numbers.write().retain(|n| *n != 4);
    println!("live:   {:?}", threes.to_vec()?);
    println!("frozen: {:?}", frozen.to_vec()?);
    Ok(())
}

fn select_plus_one() -> Result<(), QueryError> {
    let numbers = vec![1, 2, 3, 4];
    let query = from(&numbers).select(|n| n + 1)?.filter(equals(3))?;
    println!("x + 1 == 3: {:?}", query.to_vec()?);
    println!("first == 50 or default: {}", from(&numbers).first_or_default(equals(50))?);
    Ok(())
}
